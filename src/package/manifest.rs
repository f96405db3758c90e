//! tincan.xml reading
//!
//! Only the launch reference is of interest. The first `<launch>` element
//! anywhere in the document wins, namespace prefixes are ignored.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::Result;

/// Trimmed text of the first `<launch>` element, if any
pub fn launch_reference(xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut in_launch = false;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"launch" => {
                in_launch = true;
                text.clear();
            }
            Event::Text(t) if in_launch => {
                text.push_str(&t.unescape()?);
            }
            Event::CData(c) if in_launch => {
                text.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Event::End(e) if in_launch && e.local_name().as_ref() == b"launch" => {
                let launch = text.trim();
                if !launch.is_empty() {
                    return Ok(Some(launch.to_string()));
                }
                in_launch = false;
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORYLINE_TINCAN: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?>
<tincan xmlns="http://projecttincan.com/tincan.xsd">
  <activities>
    <activity id="http://example.com/course" type="http://adlnet.gov/expapi/activities/course">
      <name lang="und">Safety Basics</name>
      <description lang="und" />
      <launch lang="und">story.html</launch>
    </activity>
  </activities>
</tincan>"#;

    #[test]
    fn test_launch_reference_from_storyline_manifest() {
        assert_eq!(
            launch_reference(STORYLINE_TINCAN).unwrap(),
            Some("story.html".to_string())
        );
    }

    #[test]
    fn test_launch_reference_is_trimmed_and_unescaped() {
        let xml = "<tincan><launch>\n   content/start.html?a=1&amp;b=2  \n</launch></tincan>";
        assert_eq!(
            launch_reference(xml).unwrap(),
            Some("content/start.html?a=1&b=2".to_string())
        );
    }

    #[test]
    fn test_launch_reference_cdata() {
        let xml = "<tincan><launch><![CDATA[index_lms.html]]></launch></tincan>";
        assert_eq!(launch_reference(xml).unwrap(), Some("index_lms.html".to_string()));
    }

    #[test]
    fn test_first_non_empty_launch_wins() {
        let xml = "<tincan><launch></launch><launch>a.html</launch><launch>b.html</launch></tincan>";
        assert_eq!(launch_reference(xml).unwrap(), Some("a.html".to_string()));
    }

    #[test]
    fn test_no_launch_element() {
        let xml = "<tincan><activities/></tincan>";
        assert_eq!(launch_reference(xml).unwrap(), None);
    }

    #[test]
    fn test_malformed_manifest() {
        let xml = "<tincan><launch>index.html</tincan>";
        assert!(launch_reference(xml).is_err());
    }
}
