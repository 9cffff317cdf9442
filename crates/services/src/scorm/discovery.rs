use std::collections::HashSet;

use selector_core::scorm::ApiHandle;
use tracing::trace;

use super::frames::{FrameHost, FrameId};

/// Maximum number of parent hops before giving up on a chain.
pub const DEFAULT_FIND_ATTEMPT_LIMIT: usize = 500;

/// A located host API.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub handle: ApiHandle,
    /// Frame the API object is bound on.
    pub frame: FrameId,
    /// Parent hops from the chain's starting frame.
    pub hops: usize,
    /// Found through the opener window rather than the local chain.
    pub via_opener: bool,
}

/// Locate the host API.
///
/// Walks from the current frame up through its parents, then retries from
/// the opener of the current frame (or of the top-most frame reached). Within
/// a frame the 2004 binding wins over the 1.2 one. An API `D` hops away is
/// found iff `D <= limit`; parent cycles end the walk.
#[must_use]
pub fn discover(host: &dyn FrameHost, limit: usize) -> Option<Discovery> {
    let start = host.current();
    let topmost = match walk_chain(host, start, limit) {
        Ok(found) => return Some(found),
        Err(topmost) => topmost,
    };

    let opener = host.opener(start).or_else(|| host.opener(topmost))?;
    trace!(opener = opener.index(), "retrying API lookup through opener");
    walk_chain(host, opener, limit)
        .ok()
        .map(|found| Discovery {
            via_opener: true,
            ..found
        })
}

/// Search `start` and its ancestors. On a miss, returns the last frame visited.
fn walk_chain(host: &dyn FrameHost, start: FrameId, limit: usize) -> Result<Discovery, FrameId> {
    let mut frame = start;
    let mut hops = 0;
    let mut visited = HashSet::from([start]);

    loop {
        if let Some(handle) = api_at(host, frame) {
            trace!(frame = frame.index(), hops, version = %handle.version(), "found API");
            return Ok(Discovery {
                handle,
                frame,
                hops,
                via_opener: false,
            });
        }
        let Some(parent) = host.parent(frame).filter(|parent| *parent != frame) else {
            return Err(frame);
        };
        if hops >= limit {
            trace!(limit, "find attempt limit reached");
            return Err(frame);
        }
        if !visited.insert(parent) {
            trace!(frame = parent.index(), "parent chain loops back");
            return Err(frame);
        }
        frame = parent;
        hops += 1;
    }
}

fn api_at(host: &dyn FrameHost, frame: FrameId) -> Option<ApiHandle> {
    host.api_2004(frame)
        .map(ApiHandle::V2004)
        .or_else(|| host.api_12(frame).map(ApiHandle::V12))
}
