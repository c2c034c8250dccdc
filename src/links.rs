//! Internal link schemes recognized by click interception.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

const LINK_ACTION_SCHEME: &str = "webkit-link-action";

fn profile_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^webkit-profile://(.+)/(.+)#([0-9]+)$")
            .expect("profile URL pattern is valid")
    })
}

/// `webkit-profile://<type>/<title>#<uid>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileLink {
    pub profile_type: String,
    pub title: String,
    pub uid: u64,
}

pub fn parse_profile_url(href: &str) -> Option<ProfileLink> {
    let captures = profile_regex().captures(href)?;
    Some(ProfileLink {
        profile_type: captures[1].to_string(),
        title: captures[2].to_string(),
        uid: captures[3].parse().ok()?,
    })
}

/// Actions encoded as `webkit-link-action://<action>/<argument>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    ShowPanel(String),
}

pub fn parse_link_action(href: &str) -> Option<LinkAction> {
    let url = Url::parse(href).ok()?;
    if url.scheme() != LINK_ACTION_SCHEME {
        return None;
    }
    match url.host_str()? {
        "show-panel" => {
            let key = url.path().trim_start_matches('/');
            if key.is_empty() {
                return None;
            }
            Some(LinkAction::ShowPanel(key.to_string()))
        }
        other => {
            log::debug!("Unknown link action '{}'", other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_urls() {
        let link = parse_profile_url("webkit-profile://CPU/Profile 1#3").unwrap();
        assert_eq!(link.profile_type, "CPU");
        assert_eq!(link.title, "Profile 1");
        assert_eq!(link.uid, 3);

        assert!(parse_profile_url("webkit-profile://CPU/Profile 1").is_none());
        assert!(parse_profile_url("http://example.com/#3").is_none());
    }

    #[test]
    fn show_panel_action() {
        assert_eq!(
            parse_link_action("webkit-link-action://show-panel/network"),
            Some(LinkAction::ShowPanel("network".into()))
        );
        assert_eq!(parse_link_action("webkit-link-action://show-panel/"), None);
        assert_eq!(parse_link_action("webkit-link-action://explode/now"), None);
        assert_eq!(parse_link_action("http://show-panel/network"), None);
    }
}
