//! Region cache
//!
//! Remembers what each region last showed on the panel and when it was last
//! cleaned by a full refresh. Entries only change after the panel accepted a
//! write, so a failed write leaves the region dirty for the next cycle.

use alloc::collections::BTreeMap;

use chrono::NaiveDateTime;
use inkstation_display::{ContentHash, RefreshMode};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::record::Record;
use crate::layout::RegionName;
use crate::render::RenderedContent;

/// What the panel currently shows for one region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Hash of the last bitmap written
    pub last_hash: ContentHash,
    /// Time of the last full refresh
    pub last_full_refresh: NaiveDateTime,
    /// Cycle number of the last full refresh
    pub last_full_cycle: u64,
    /// Partial refreshes since the last full refresh
    pub partial_count: u32,
}

/// Why a region needs a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DirtyReason {
    /// Never written
    New,
    /// Not fully refreshed for longer than the partial age limit
    Aged,
    /// Content hash differs from what the panel shows
    Changed,
}

impl DirtyReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            DirtyReason::New => "new",
            DirtyReason::Aged => "aged",
            DirtyReason::Changed => "changed",
        }
    }
}

/// Dirty regions and the reason each is dirty
pub type DirtySet = BTreeMap<RegionName, DirtyReason>;

/// Per-region cache table
///
/// Tied to the layout it was recorded for. The cycle counter advances once
/// per rendered cycle and measures region age.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegionCache {
    cycle: u64,
    layout: ContentHash,
    entries: BTreeMap<RegionName, CacheEntry>,
}

impl Record for RegionCache {
    const MAGIC: u32 = 0x494E_4B43; // "INKC"
}

impl RegionCache {
    /// Create an empty cache for a layout
    pub fn new(layout: ContentHash) -> Self {
        Self {
            cycle: 0,
            layout,
            entries: BTreeMap::new(),
        }
    }

    /// Keep this cache if it was recorded for `layout`, otherwise start cold
    pub fn for_layout(self, layout: ContentHash) -> Self {
        if self.layout == layout {
            self
        } else {
            warn!(
                "Region cache was recorded for layout {}, now {}; starting cold",
                self.layout, layout
            );
            Self::new(layout)
        }
    }

    /// Fingerprint of the layout this cache belongs to
    pub fn layout(&self) -> ContentHash {
        self.layout
    }

    /// Current cycle number
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Start a new cycle and return its number
    pub fn begin_cycle(&mut self) -> u64 {
        self.cycle = self.cycle.saturating_add(1);
        self.cycle
    }

    /// Entry for a region
    pub fn get(&self, region: RegionName) -> Option<&CacheEntry> {
        self.entries.get(&region)
    }

    /// Number of cached regions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cycles since the region's last full refresh
    pub fn age(&self, region: RegionName) -> Option<u64> {
        self.entries
            .get(&region)
            .map(|entry| self.cycle.saturating_sub(entry.last_full_cycle))
    }

    /// Decide which regions need a write
    ///
    /// A region is dirty when it has no entry, when it has gone more than
    /// `max_partial_age` cycles without a full refresh, or when its hash
    /// changed.
    pub fn diff(&self, contents: &[RenderedContent], max_partial_age: u32) -> DirtySet {
        let mut dirty = DirtySet::new();
        for content in contents {
            let reason = match self.entries.get(&content.region) {
                None => Some(DirtyReason::New),
                Some(entry) => {
                    let age = self.cycle.saturating_sub(entry.last_full_cycle);
                    if age > max_partial_age as u64 {
                        Some(DirtyReason::Aged)
                    } else if entry.last_hash != content.hash {
                        Some(DirtyReason::Changed)
                    } else {
                        None
                    }
                }
            };
            if let Some(reason) = reason {
                debug!("{} dirty ({})", content.region, reason.as_str());
                dirty.insert(content.region, reason);
            }
        }
        dirty
    }

    /// Record a write the panel accepted
    pub fn commit(
        &mut self,
        region: RegionName,
        hash: ContentHash,
        timestamp: NaiveDateTime,
        mode: RefreshMode,
    ) {
        let cycle = self.cycle;
        let entry = self.entries.entry(region).or_insert(CacheEntry {
            last_hash: hash,
            last_full_refresh: timestamp,
            last_full_cycle: cycle,
            partial_count: 0,
        });
        entry.last_hash = hash;
        match mode {
            RefreshMode::Full => {
                entry.last_full_refresh = timestamp;
                entry.last_full_cycle = cycle;
                entry.partial_count = 0;
            }
            RefreshMode::Partial => {
                entry.partial_count = entry.partial_count.saturating_add(1);
            }
        }
    }
}
