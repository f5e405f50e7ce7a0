// Presentation attribute normalization for `img` elements: `width` and
// `height` are dropped and replaced by a fixed inline style policy.

use lol_html::html_content::Element;
use lol_html::HandlerResult;

/// Which inline style rules are synthesized for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImagePolicy {
    /// `max-width: 95%; text-align: center; [width:Npx;] height: auto;`
    #[default]
    PreserveWidth,
    /// `max-width: 95%; height: auto;`
    Simple,
}

impl ImagePolicy {
    fn style_rules(self, original_width: Option<&str>) -> String {
        let mut parts: Vec<String> = vec!["max-width: 95%".into()];
        if self == ImagePolicy::PreserveWidth {
            parts.push("text-align: center".into());
            if let Some(w) = original_width.and_then(|w| w.trim().parse::<i64>().ok()) {
                parts.push(format!("width:{w}px"));
            }
        }
        parts.push("height: auto".into());
        parts.join("; ") + ";"
    }
}

/// Strip `width`/`height` and append the policy's rules to `style`.
/// Attributes already on the element keep their position.
pub fn normalize(img: &mut Element<'_, '_>, policy: ImagePolicy) -> HandlerResult {
    let original_width = img.get_attribute("width");
    img.remove_attribute("width");
    img.remove_attribute("height");

    let new_rules = policy.style_rules(original_width.as_deref());
    let current = img.get_attribute("style").unwrap_or_default();
    let current = current.trim();
    let style = if current.is_empty() {
        new_rules
    } else if current.ends_with(';') {
        format!("{current} {new_rules}")
    } else {
        format!("{current}; {new_rules}")
    };
    img.set_attribute("style", &style)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lol_html::{element, rewrite_str, RewriteStrSettings};
    use pretty_assertions::assert_eq;

    fn normalized(html: &str, policy: ImagePolicy) -> String {
        rewrite_str(
            html,
            RewriteStrSettings {
                element_content_handlers: vec![element!("img", |img| normalize(img, policy))],
                ..RewriteStrSettings::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn integer_width_becomes_pixel_rule() {
        assert_eq!(
            normalized(
                r#"<img src="a.png" width="300" height="200">"#,
                ImagePolicy::PreserveWidth,
            ),
            r#"<img src="a.png" style="max-width: 95%; text-align: center; width:300px; height: auto;">"#
        );
    }

    #[test]
    fn non_integer_width_is_dropped() {
        assert_eq!(
            normalized(r#"<img src="a.png" width="50%">"#, ImagePolicy::PreserveWidth),
            r#"<img src="a.png" style="max-width: 95%; text-align: center; height: auto;">"#
        );
    }

    #[test]
    fn existing_style_is_appended_to_in_place() {
        assert_eq!(
            normalized(
                r#"<img style="border: 1px solid " src="a.png" width="10">"#,
                ImagePolicy::PreserveWidth,
            ),
            r#"<img style="border: 1px solid; max-width: 95%; text-align: center; width:10px; height: auto;" src="a.png">"#
        );
        assert_eq!(
            normalized(r#"<img src="a.png" style="float: left;">"#, ImagePolicy::Simple),
            r#"<img src="a.png" style="float: left; max-width: 95%; height: auto;">"#
        );
    }

    #[test]
    fn simple_policy_ignores_width() {
        assert_eq!(
            normalized(
                r#"<img src="a.png" width="300" height="20">"#,
                ImagePolicy::Simple,
            ),
            r#"<img src="a.png" style="max-width: 95%; height: auto;">"#
        );
    }

    #[test]
    fn second_pass_does_not_add_width_again() {
        let once = normalized(r#"<img src="a.png" width="40">"#, ImagePolicy::PreserveWidth);
        let twice = normalized(&once, ImagePolicy::PreserveWidth);
        assert_eq!(
            twice,
            r#"<img src="a.png" style="max-width: 95%; text-align: center; width:40px; height: auto; max-width: 95%; text-align: center; height: auto;">"#
        );
    }
}
