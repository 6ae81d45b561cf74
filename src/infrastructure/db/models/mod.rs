pub mod comments;
pub mod users;
pub mod videos;

use crate::domain::assets::RemoteAsset;

/// Rebuilds an optional asset reference from its two nullable columns.
pub(crate) fn asset_pair(remote_id: Option<String>, url: Option<String>) -> Option<RemoteAsset> {
    match (remote_id, url) {
        (Some(remote_id), Some(url)) => Some(RemoteAsset { remote_id, url }),
        _ => None,
    }
}
