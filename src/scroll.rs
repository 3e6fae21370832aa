use std::time::{Duration, Instant};

/// Number of day cells that fit across the viewport
pub(crate) const VISIBLE_DAYS: u16 = 9;

/// How long a drag gesture must go without input before it is considered
/// finished and the view snaps to the nearest day
pub(crate) const SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Interval between animation steps of an animated scroll
pub(crate) const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Column layout of the day strip for a given viewport width
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct StripGeometry {
    pub(crate) viewport: u16,
    /// Width of a single day cell: `round(viewport / 9)`, at least 1
    pub(crate) day_width: u16,
    /// Padding before the first and after the last cell, chosen so that the
    /// centred cell lines up with the middle of the viewport:
    /// `round((viewport - day_width) / 2)`
    pub(crate) inset: u16,
}

impl StripGeometry {
    pub(crate) fn for_viewport(viewport: u16) -> StripGeometry {
        let day_width = (viewport.saturating_add(VISIBLE_DAYS / 2) / VISIBLE_DAYS).max(1);
        let inset = viewport.saturating_sub(day_width).saturating_add(1) / 2;
        StripGeometry {
            viewport,
            day_width,
            inset,
        }
    }

    pub(crate) fn mapper(&self) -> ScrollPositionMapper {
        ScrollPositionMapper::new(self.day_width)
    }
}

/// Converts between day numbers and horizontal scroll offsets for cells of a
/// fixed width.  Day 1 is at offset 0.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct ScrollPositionMapper {
    day_width: u32,
}

impl ScrollPositionMapper {
    pub(crate) fn new(day_width: u16) -> ScrollPositionMapper {
        ScrollPositionMapper {
            day_width: u32::from(day_width.max(1)),
        }
    }

    pub(crate) fn day_to_offset(&self, day: u8) -> u32 {
        u32::from(day.saturating_sub(1)) * self.day_width
    }

    /// Returns the day whose cell is nearest to `offset`, rounding halves up
    pub(crate) fn offset_to_day(&self, offset: u32) -> u8 {
        let index = offset.saturating_add(self.day_width / 2) / self.day_width;
        u8::try_from(index.saturating_add(1)).unwrap_or(u8::MAX)
    }

    /// Rounds `offset` to the nearest multiple of the day width
    pub(crate) fn snap(&self, offset: u32) -> u32 {
        self.day_to_offset(self.offset_to_day(offset))
    }
}

/// The part of a scrollable view that the picker drives
pub(crate) trait ScrollSurface {
    fn day_width(&self) -> u16;

    fn scroll_to(&mut self, offset: u32, animated: bool);
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum ScrollEvent {
    /// A drag gesture settled; the view has snapped to `offset`
    MomentumEnd { offset: u32 },
    /// An animated scroll reached its target
    AnimationEnd { offset: u32 },
}

/// A horizontally scrollable strip of equally sized day cells
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ScrollView {
    geometry: StripGeometry,
    content_len: u8,
    offset: u32,
    target: Option<u32>,
    last_drag: Option<Instant>,
}

impl ScrollView {
    pub(crate) fn new() -> ScrollView {
        ScrollView {
            geometry: StripGeometry::for_viewport(0),
            content_len: 0,
            offset: 0,
            target: None,
            last_drag: None,
        }
    }

    pub(crate) fn geometry(&self) -> StripGeometry {
        self.geometry
    }

    pub(crate) fn offset(&self) -> u32 {
        self.offset
    }

    fn max_offset(&self) -> u32 {
        self.geometry.mapper().day_to_offset(self.content_len)
    }

    /// Sets the number of cells in the strip, clamping the current position
    pub(crate) fn set_content_len(&mut self, len: usize) {
        self.content_len = u8::try_from(len).unwrap_or(u8::MAX);
        let max = self.max_offset();
        self.offset = self.offset.min(max);
        self.target = self.target.map(|t| t.min(max));
    }

    /// Updates the geometry for a new viewport width.  The day under the
    /// centre of the viewport stays there.
    pub(crate) fn set_viewport(&mut self, width: u16) {
        if width == self.geometry.viewport {
            return;
        }
        let old = self.geometry.mapper();
        self.geometry = StripGeometry::for_viewport(width);
        let new = self.geometry.mapper();
        let max = self.max_offset();
        self.offset = new.day_to_offset(old.offset_to_day(self.offset)).min(max);
        self.target = self
            .target
            .map(|t| new.day_to_offset(old.offset_to_day(t)).min(max));
    }

    /// Moves the view by `delta` columns as part of a user gesture.  Any
    /// running animation is abandoned.
    pub(crate) fn drag(&mut self, delta: i32, now: Instant) {
        self.target = None;
        self.offset = if delta < 0 {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta.unsigned_abs())
        }
        .min(self.max_offset());
        self.last_drag = Some(now);
    }

    /// Returns the day drawn at column `x` of the viewport, if any
    pub(crate) fn day_at_column(&self, x: u16) -> Option<u8> {
        let content_x = u32::from(x)
            .saturating_add(self.offset)
            .checked_sub(u32::from(self.geometry.inset))?;
        let index = content_x / u32::from(self.geometry.day_width);
        let day = u8::try_from(index.checked_add(1)?).ok()?;
        (day <= self.content_len).then_some(day)
    }

    /// Returns the time at which [`ScrollView::tick()`] next has work to do
    pub(crate) fn next_deadline(&self, now: Instant) -> Option<Instant> {
        if self.target.is_some() {
            Some(now + FRAME_INTERVAL)
        } else {
            self.last_drag.map(|t| t + SETTLE_DELAY)
        }
    }

    /// Advances any running animation by one step and settles finished
    /// gestures
    pub(crate) fn tick(&mut self, now: Instant) -> Option<ScrollEvent> {
        if let Some(target) = self.target {
            let distance = target.abs_diff(self.offset);
            let step = distance.div_ceil(4).max(1).min(distance);
            if target > self.offset {
                self.offset += step;
            } else {
                self.offset -= step;
            }
            if self.offset == target {
                self.target = None;
                return Some(ScrollEvent::AnimationEnd { offset: target });
            }
            return None;
        }
        let last = self.last_drag?;
        if now.saturating_duration_since(last) < SETTLE_DELAY {
            return None;
        }
        self.last_drag = None;
        self.offset = self.geometry.mapper().snap(self.offset).min(self.max_offset());
        Some(ScrollEvent::MomentumEnd {
            offset: self.offset,
        })
    }
}

impl Default for ScrollView {
    fn default() -> ScrollView {
        ScrollView::new()
    }
}

impl ScrollSurface for ScrollView {
    fn day_width(&self) -> u16 {
        self.geometry.day_width
    }

    fn scroll_to(&mut self, offset: u32, animated: bool) {
        let offset = offset.min(self.max_offset());
        self.last_drag = None;
        // An animated scroll to the current offset still finishes with an
        // `AnimationEnd` on the next tick
        if animated {
            self.target = Some(offset);
        } else {
            self.target = None;
            self.offset = offset;
        }
    }
}
