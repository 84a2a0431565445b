pub const STYLESHEET: &str = r#"
body {
    background-color: #f4f6f9;
    font-family: -apple-system, "Segoe UI", Roboto, sans-serif;
    margin: 0;
}
.page {
    max-width: 1200px;
    margin: 0 auto;
    padding: 24px;
}
.banner-container {
    background-color: #1c2c52;
    padding: 40px 20px 25px 20px;
    border-radius: 15px 15px 0 0;
    color: white;
    text-align: center;
}
.banner-container h1 {
    color: white;
    font-size: 3rem;
    font-weight: 800;
    margin: 0;
}
.banner-container p {
    color: #cfd8dc;
    font-size: 1.2rem;
    margin: 5px 0 0 0;
}
.run-form {
    margin: -1px 0 0 0;
}
.run-form button {
    background-color: #1c2c52;
    color: white;
    border: none;
    border-top: 1px solid #34495e;
    border-radius: 0 0 15px 15px;
    font-weight: 800;
    font-size: 1.2rem;
    padding: 15px 0;
    width: 100%;
    text-transform: uppercase;
    letter-spacing: 2px;
    box-shadow: 0 4px 6px rgba(0,0,0,0.1);
    cursor: pointer;
    transition: background-color 0.3s;
}
.run-form button:hover {
    background-color: #2a4075;
}
.notice {
    margin-top: 20px;
    padding: 16px 20px;
    border-radius: 10px;
    font-weight: 600;
}
.notice-info { background-color: #e3f2fd; color: #1565c0; }
.notice-error { background-color: #fdecea; color: #b71c1c; }
.notice-warn { background-color: #fff8e1; color: #8d6e00; }
.columns {
    display: grid;
    grid-template-columns: repeat(3, 1fr);
    gap: 20px;
}
.metric-card {
    border-radius: 15px;
    padding: 20px;
    height: 400px;
    overflow-y: auto;
    box-shadow: 0 4px 6px rgba(0,0,0,0.05);
    color: #1c2c52;
    margin-top: 20px;
}
.card-blue { background-color: #96ccf5; }
.card-pink { background-color: #ed74b2; color: white; }
.card-header {
    font-size: 1.4rem;
    font-weight: 900;
    margin-bottom: 15px;
    text-transform: uppercase;
    display: flex;
    align-items: center;
    gap: 10px;
}
.section-header {
    background: linear-gradient(90deg, #2755a2 0%, #488cc8 50%, #da76b4 100%);
    color: white;
    padding: 15px;
    border-radius: 15px 15px 0 0;
    font-size: 1.5rem;
    font-weight: 800;
    text-align: center;
    margin-top: 40px;
}
.section-content {
    background-color: white;
    padding: 30px;
    border-radius: 0 0 15px 15px;
    box-shadow: 0 4px 10px rgba(0,0,0,0.05);
}
.section-content h3 {
    color: #1c2c52;
    font-weight: 900;
    margin-bottom: 20px;
}
.section-content h3.drafts-heading {
    margin-top: 40px;
    border-top: 1px solid #eee;
    padding-top: 20px;
}
.hot-take-item {
    border-bottom: 1px solid #eee;
    padding-bottom: 20px;
    margin-bottom: 20px;
}
.hot-take-title {
    color: #1c2c52;
    font-size: 1.3rem;
    font-weight: 900;
    display: block;
    margin-bottom: 5px;
}
.hot-take-meta {
    font-size: 1rem;
    color: #555;
    margin-bottom: 8px;
    display: block;
}
.crucial-badge {
    background-color: #e3f2fd;
    color: #1565c0;
    padding: 4px 8px;
    border-radius: 4px;
    font-weight: bold;
    font-size: 0.9rem;
}
.draft-wrapper {
    margin-bottom: 30px;
}
.draft-label {
    color: #1c2c52;
    font-weight: 800;
    font-size: 1.1rem;
    margin: 10px 0 5px 0;
    display: block;
}
.draft-block {
    background-color: #f8f9fa;
    border-left: 5px solid #1c2c52;
    padding: 20px;
    font-family: sans-serif;
    color: #333;
    white-space: pre-wrap;
    line-height: 1.6;
}
.footer {
    text-align: center;
    color: #888;
    margin-top: 20px;
}
"#;
