//! Launch page for xAPI packages
//!
//! xAPI content expects its LRS connection details in the launch URL query
//! string. The page opens the course in a separate window with those
//! parameters appended and offers a plain link as a fallback.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use uuid::Uuid;

/// Query parameters handed to xAPI content at launch
#[derive(Debug, Clone)]
pub struct XapiLaunchParams {
    pub endpoint: String,
    pub auth: String,
    pub actor: String,
    pub content_token: String,
    pub activity_id: String,
    pub registration: String,
}

impl XapiLaunchParams {
    /// Fresh parameters for one launch of `course_id`.
    ///
    /// The endpoint is the statement stub of this server. Credentials and
    /// registration are random per launch.
    pub fn new(public_base_url: &str, course_id: &str) -> Self {
        let actor = json!({
            "name": ["Course Host User"],
            "account": [{
                "accountServiceHomePage": public_base_url,
                "accountName": "course-host-user",
            }],
            "objectType": "Agent",
        });

        Self {
            endpoint: format!(
                "{}/xapi/{}",
                public_base_url,
                urlencoding::encode(course_id)
            ),
            auth: format!(
                "Basic {}",
                STANDARD.encode(format!(":{}", Uuid::new_v4().simple()))
            ),
            actor: actor.to_string(),
            content_token: Uuid::new_v4().simple().to_string(),
            activity_id: format!("http://{}", course_id),
            registration: Uuid::new_v4().simple().to_string(),
        }
    }

    /// URL-encoded query string
    pub fn to_query(&self) -> String {
        [
            ("actor", &self.actor),
            ("endpoint", &self.endpoint),
            ("auth", &self.auth),
            ("content_token", &self.content_token),
            ("activity_id", &self.activity_id),
            ("registration", &self.registration),
        ]
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
    }
}

/// Render the interstitial page that opens `launch_url` in a new window
pub fn render_launch_page(launch_url: &str) -> String {
    let href = html_escape::encode_double_quoted_attribute(launch_url);
    // A JSON string literal is a valid JS string literal
    let script_url = serde_json::to_string(launch_url).unwrap_or_else(|_| "\"\"".to_string());
    let script_url = script_url.replace("</", "<\\/");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Launching Course</title>
  <style>
    body {{ font-family: Arial, sans-serif; text-align: center; padding: 20px; }}
    .launching {{ margin: 20px; }}
    .spinner {{
      width: 40px;
      height: 40px;
      border: 4px solid #f3f3f3;
      border-top: 4px solid #3498db;
      border-radius: 50%;
      animation: spin 1s linear infinite;
      margin: 20px auto;
    }}
    @keyframes spin {{
      0% {{ transform: rotate(0deg); }}
      100% {{ transform: rotate(360deg); }}
    }}
  </style>
</head>
<body>
  <div class="launching">
    <h2>Launching Course...</h2>
    <div class="spinner"></div>
    <p>If the course doesn't open automatically, <a href="{href}" target="_blank">click here</a></p>
  </div>
  <script>
    window.onload = function() {{
      window.open({script_url}, 'courseWindow',
        'width=1024,height=768,menubar=no,toolbar=no,location=no,status=no');
    }};
  </script>
</body>
</html>
"#
    )
}
