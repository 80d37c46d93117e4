use crate::domain::GameCandidate;
use tracing::{debug, info};
use url::Url;

pub fn is_allowed_image(image_url: &str, allowed_hosts: &[&str]) -> bool {
    Url::parse(image_url)
        .ok()
        .and_then(|url| url.host_str().map(|h| allowed_hosts.contains(&h)))
        .unwrap_or(false)
}

/// Keeps candidates whose image is served from an allowed host, in order.
///
/// When nothing survives the result is empty; the unfiltered list is never
/// served in its place.
pub fn filter_by_image_host(
    candidates: Vec<GameCandidate>,
    allowed_hosts: &[&str],
) -> Vec<GameCandidate> {
    let total = candidates.len();
    let kept: Vec<GameCandidate> = candidates
        .into_iter()
        .filter(|c| {
            let allowed = c
                .image_url
                .as_deref()
                .is_some_and(|u| is_allowed_image(u.trim(), allowed_hosts));
            if !allowed {
                debug!(
                    "Dropping {:?}: image {:?} is not on an allowed host",
                    c.title, c.image_url
                );
            }
            allowed
        })
        .collect();

    if kept.len() < total {
        info!(
            "Image host filter kept {} of {} candidates",
            kept.len(),
            total
        );
    }
    kept
}
