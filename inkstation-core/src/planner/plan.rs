//! Refresh planning
//!
//! Maps dirty regions and their cache history to an ordered list of panel
//! operations.

use alloc::vec::Vec;

use inkstation_display::{Bitmap, ContentHash, Rect, RefreshMode};
use log::debug;

use super::state::{RegionEvent, RegionState};
use crate::cache::{DirtySet, RegionCache};
use crate::config::RefreshConfig;
use crate::layout::{RegionName, REGION_COUNT};
use crate::render::RenderedContent;

/// Regions covered by one plan entry, with the hashes being written
pub type EntryRegions = heapless::Vec<(RegionName, ContentHash), REGION_COUNT>;

/// Thresholds and switches for one planning pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanPolicy {
    /// Cycles without a full refresh before a write is upgraded to full
    pub max_partial_age: u32,
    /// Partial refreshes before the next write is upgraded to full
    pub ghosting_threshold: u32,
    /// Merge an all-full plan into one whole-panel operation
    pub coalesce_full: bool,
    /// Write every region with a full refresh
    pub force_full: bool,
}

impl PlanPolicy {
    pub fn from_config(config: &RefreshConfig, force_full: bool) -> Self {
        Self {
            max_partial_age: config.max_partial_age,
            ghosting_threshold: config.ghosting_threshold,
            coalesce_full: config.coalesce_full,
            force_full,
        }
    }
}

/// One panel operation: write `bitmap` at `rect`, then refresh with `mode`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub regions: EntryRegions,
    pub rect: Rect,
    pub bitmap: Bitmap,
    pub mode: RefreshMode,
}

/// Ordered panel operations for one cycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdatePlan {
    pub entries: Vec<PlanEntry>,
}

impl UpdatePlan {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, PlanEntry> {
        self.entries.iter()
    }

    /// Check if the plan is a single whole-panel operation
    pub fn is_coalesced(&self) -> bool {
        self.entries.len() == 1 && self.entries[0].regions.len() > 1
    }

    /// Every region the plan writes, in plan order
    pub fn regions(&self) -> impl Iterator<Item = RegionName> + '_ {
        self.entries
            .iter()
            .flat_map(|entry| entry.regions.iter().map(|(region, _)| *region))
    }

    /// Refresh mode used for a region, if the plan writes it
    pub fn mode_of(&self, region: RegionName) -> Option<RefreshMode> {
        self.entries
            .iter()
            .find(|entry| entry.regions.iter().any(|(r, _)| *r == region))
            .map(|entry| entry.mode)
    }
}

/// Work out the refresh state of one region
pub fn region_state(
    region: RegionName,
    dirty: &DirtySet,
    cache: &RegionCache,
    policy: &PlanPolicy,
) -> RegionState {
    let mut events: heapless::Vec<RegionEvent, 4> = heapless::Vec::new();
    if policy.force_full {
        let _ = events.push(RegionEvent::ForceFull);
    }
    if dirty.contains_key(&region) {
        let _ = events.push(RegionEvent::Dirty);
    }
    match cache.get(region) {
        None => {
            let _ = events.push(RegionEvent::FirstWrite);
        }
        Some(entry) => {
            if cache.age(region).unwrap_or(0) > policy.max_partial_age as u64 {
                let _ = events.push(RegionEvent::AgeExceeded);
            } else if entry.partial_count >= policy.ghosting_threshold {
                let _ = events.push(RegionEvent::GhostingLimit);
            }
        }
    }

    events
        .into_iter()
        .fold(RegionState::Clean, RegionState::transition)
}

/// Build the update plan
///
/// Entries follow region priority order. Clean regions are omitted. When
/// every region needs a full refresh and coalescing is enabled, the plan is
/// a single whole-panel full refresh composed from all region bitmaps.
pub fn plan(
    dirty: &DirtySet,
    contents: &[RenderedContent],
    cache: &RegionCache,
    panel: Rect,
    policy: &PlanPolicy,
) -> UpdatePlan {
    let mut ordered: Vec<&RenderedContent> = contents.iter().collect();
    ordered.sort_by_key(|content| content.region);

    let states: Vec<RegionState> = ordered
        .iter()
        .map(|content| region_state(content.region, dirty, cache, policy))
        .collect();

    let all_full = !states.is_empty() && states.iter().all(|s| *s == RegionState::NeedsFull);
    if all_full && policy.coalesce_full {
        if let Some(entry) = coalesce(&ordered, panel) {
            debug!("Coalesced {} regions into one full refresh", ordered.len());
            return UpdatePlan {
                entries: alloc::vec![entry],
            };
        }
    }

    let mut entries = Vec::new();
    for (content, state) in ordered.iter().zip(&states) {
        let mode = match state {
            RegionState::Clean => continue,
            RegionState::NeedsPartial => RefreshMode::Partial,
            RegionState::NeedsFull => RefreshMode::Full,
        };
        debug!("{} -> {} refresh", content.region, mode);

        let mut regions = EntryRegions::new();
        let _ = regions.push((content.region, content.hash));
        entries.push(PlanEntry {
            regions,
            rect: content.rect,
            bitmap: content.bitmap.clone(),
            mode,
        });
    }

    UpdatePlan { entries }
}

/// Compose every region onto one panel-sized bitmap
fn coalesce(ordered: &[&RenderedContent], panel: Rect) -> Option<PlanEntry> {
    let mut regions = EntryRegions::new();
    let mut bitmap = Bitmap::new(panel.width, panel.height);
    for content in ordered {
        regions.push((content.region, content.hash)).ok()?;
        bitmap.blit(&content.bitmap, content.rect.x as i32, content.rect.y as i32);
    }
    Some(PlanEntry {
        regions,
        rect: panel,
        bitmap,
        mode: RefreshMode::Full,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn content(region: RegionName, index: u32, seed: bool) -> RenderedContent {
        let mut bitmap = Bitmap::new(10, 10);
        bitmap.set(0, 0, seed);
        bitmap.set(1, 1, true);
        RenderedContent {
            region,
            rect: Rect::new(index * 10, 0, 10, 10),
            hash: bitmap.content_hash(),
            bitmap,
        }
    }

    fn all_contents(seed: bool) -> Vec<RenderedContent> {
        RegionName::ALL
            .iter()
            .enumerate()
            .map(|(i, r)| content(*r, i as u32, seed))
            .collect()
    }

    fn panel() -> Rect {
        Rect::panel(80, 10)
    }

    fn policy() -> PlanPolicy {
        PlanPolicy {
            max_partial_age: 100,
            ghosting_threshold: 3,
            coalesce_full: false,
            force_full: false,
        }
    }

    fn warm_cache(contents: &[RenderedContent]) -> RegionCache {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut cache = RegionCache::new(ContentHash(7));
        cache.begin_cycle();
        for c in contents {
            cache.commit(c.region, c.hash, ts, RefreshMode::Full);
        }
        cache.begin_cycle();
        cache
    }

    #[test]
    fn test_first_run_all_full_in_priority_order() {
        let cache = RegionCache::new(ContentHash(7));
        let mut contents = all_contents(false);
        contents.reverse();
        let dirty = cache.diff(&contents, 100);
        let plan = plan(&dirty, &contents, &cache, panel(), &policy());

        assert_eq!(plan.len(), 8);
        let order: Vec<RegionName> = plan.regions().collect();
        assert_eq!(order, RegionName::ALL.to_vec());
        assert!(plan.iter().all(|e| e.mode == RefreshMode::Full));
    }

    #[test]
    fn test_first_run_coalesces() {
        let cache = RegionCache::new(ContentHash(7));
        let contents = all_contents(false);
        let dirty = cache.diff(&contents, 100);
        let policy = PlanPolicy {
            coalesce_full: true,
            ..policy()
        };
        let plan = plan(&dirty, &contents, &cache, panel(), &policy);

        assert!(plan.is_coalesced());
        let entry = &plan.entries[0];
        assert_eq!(entry.rect, panel());
        assert_eq!(entry.mode, RefreshMode::Full);
        assert_eq!(entry.regions.len(), 8);
        // One (1, 1) pixel per region
        assert_eq!(entry.bitmap.black_pixels(), 8);
        assert!(entry.bitmap.get(71, 1));
    }

    #[test]
    fn test_clean_regions_omitted() {
        let contents = all_contents(false);
        let cache = warm_cache(&contents);
        let dirty = cache.diff(&contents, 100);
        assert!(plan(&dirty, &contents, &cache, panel(), &policy()).is_empty());
    }

    #[test]
    fn test_changed_region_is_partial() {
        let contents = all_contents(false);
        let cache = warm_cache(&contents);
        let mut next = contents.clone();
        next[0] = content(RegionName::Clock, 0, true);

        let dirty = cache.diff(&next, 100);
        let plan = plan(&dirty, &next, &cache, panel(), &policy());
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.mode_of(RegionName::Clock), Some(RefreshMode::Partial));
        assert_eq!(plan.entries[0].rect, next[0].rect);
    }

    #[test]
    fn test_ghosting_threshold_upgrades() {
        let contents = all_contents(false);
        let mut cache = warm_cache(&contents);
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 1, 0)
            .unwrap();
        for i in 0..3 {
            cache.commit(RegionName::Clock, ContentHash(i), ts, RefreshMode::Partial);
        }

        let dirty = cache.diff(&contents, 100);
        let plan = plan(&dirty, &contents, &cache, panel(), &policy());
        assert_eq!(plan.mode_of(RegionName::Clock), Some(RefreshMode::Full));
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_force_full() {
        let contents = all_contents(false);
        let cache = warm_cache(&contents);
        let policy = PlanPolicy {
            force_full: true,
            ..policy()
        };
        let plan = plan(&DirtySet::new(), &contents, &cache, panel(), &policy);
        assert_eq!(plan.len(), 8);
        assert!(plan.iter().all(|e| e.mode == RefreshMode::Full));
    }

    #[test]
    fn test_partial_full_mix_not_coalesced() {
        let contents = all_contents(false);
        let cache = warm_cache(&contents);
        let mut next = all_contents(true);
        next[0] = contents[0].clone();

        let policy = PlanPolicy {
            coalesce_full: true,
            ..policy()
        };
        let dirty = cache.diff(&next, 100);
        let plan = plan(&dirty, &next, &cache, panel(), &policy);
        assert_eq!(plan.len(), 7);
        assert!(!plan.is_coalesced());
        assert_eq!(plan.mode_of(RegionName::Clock), None);
    }
}
