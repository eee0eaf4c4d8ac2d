//! Free peer id lookup.
//!
//! Finds the smallest id not yet held by an existing peer, reusing gaps
//! left behind by deleted peers before growing past the current maximum.

/// Ids 0 and 1 denote the gateway itself and are never handed to peers
pub const MIN_PEER_ID: u32 = 2;

/// A persisted peer that carries an assigned id
pub trait PeerRecord {
    fn peer_id(&self) -> u32;
}

impl PeerRecord for u32 {
    fn peer_id(&self) -> u32 {
        *self
    }
}

/// Return the smallest id >= [`MIN_PEER_ID`] missing from `assigned`
///
/// Ids below the minimum and duplicate entries are ignored. If every id from
/// the minimum up to `u32::MAX` is taken there is nothing left to hand out;
/// the error is logged and `u32::MAX` is returned, which allocation rejects
/// for any pool it does not fit.
///
/// # Examples
/// ```
/// use overlay_ipam::ip::find_first_free_id;
///
/// assert_eq!(find_first_free_id(&[]), 2);
/// assert_eq!(find_first_free_id(&[2, 3, 5]), 4);
/// assert_eq!(find_first_free_id(&[4, 2, 3]), 5);
/// ```
pub fn find_first_free_id(assigned: &[u32]) -> u32 {
    let mut ids: Vec<u32> = assigned.iter().copied().filter(|id| *id >= MIN_PEER_ID).collect();
    ids.sort_unstable();
    ids.dedup();
    log::debug!("Sorted peer ids: {:?}", ids);

    let Some(&max_id) = ids.last() else {
        log::debug!("No peers assigned yet, using minimum id {}", MIN_PEER_ID);
        return MIN_PEER_ID;
    };

    // Sorted and deduplicated, so the first position that breaks the
    // contiguous run from MIN_PEER_ID is a gap.
    let free_id = (MIN_PEER_ID..)
        .zip(ids.iter())
        .find(|(expected, actual)| *expected != **actual)
        .map(|(expected, _)| expected)
        .unwrap_or_else(|| {
            max_id.checked_add(1).unwrap_or_else(|| {
                log::error!("Peer id space exhausted: every id from {} to {} is assigned", MIN_PEER_ID, max_id);
                u32::MAX
            })
        });

    log::debug!("First free peer id: {} (max assigned {})", free_id, max_id);
    free_id
}

/// Return the first free id over a set of peer records
pub fn find_first_free_id_for<P: PeerRecord>(peers: &[P]) -> u32 {
    let ids: Vec<u32> = peers.iter().map(PeerRecord::peer_id).collect();
    find_first_free_id(&ids)
}
