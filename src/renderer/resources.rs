//! Graphics resource registry
//!
//! Shapes refer to brushes and bitmaps by id. The backend realizes them on
//! first use and may lose them (device loss); anything unrealized simply
//! does not draw.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BrushId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BitmapId(pub u32);

/// Solid colour, 0xRRGGBB plus alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub rgb: u32,
    pub alpha: f32,
}

impl Color {
    pub const fn rgb(rgb: u32) -> Self {
        Self { rgb, alpha: 1.0 }
    }

    pub const fn rgba(rgb: u32, alpha: f32) -> Self {
        Self { rgb, alpha }
    }

    /// Normalized [r, g, b, a]
    pub fn to_rgba(&self) -> [f32; 4] {
        let channel = |shift: u32| ((self.rgb >> shift) & 0xff) as f32 / 255.0;
        [channel(16), channel(8), channel(0), self.alpha]
    }

    /// 0xBBGGRR, the byte order some native APIs expect
    pub fn to_bgr(&self) -> u32 {
        (self.rgb & 0x0000ff) << 16 | (self.rgb & 0x00ff00) | (self.rgb & 0xff0000) >> 16
    }
}

/// Palette used by the demo scenes
pub mod colors {
    use super::Color;

    pub const WHITE: Color = Color::rgb(0xffffff);
    pub const RED: Color = Color::rgb(0xff0000);
    pub const GREEN: Color = Color::rgb(0x00ff00);
    pub const BLUE: Color = Color::rgb(0x0000ff);
    pub const YELLOW: Color = Color::rgb(0xffff00);
    pub const ORANGE: Color = Color::rgb(0xffa500);
    pub const BACKGROUND: Color = Color::rgb(0x000000);
}

/// Backend hook that turns descriptions into real handles
pub trait ResourceLoader {
    fn create_brush(&mut self, id: BrushId, color: Color) -> bool;
    fn load_bitmap(&mut self, id: BitmapId, path: &Path) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotState {
    Pending,
    Realized,
    /// Load failed; stays absent until explicitly retried
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot<T> {
    desc: T,
    state: SlotState,
}

impl<T> Slot<T> {
    fn new(desc: T) -> Self {
        Self {
            desc,
            state: SlotState::Pending,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resources {
    brushes: BTreeMap<BrushId, Slot<Color>>,
    bitmaps: BTreeMap<BitmapId, Slot<PathBuf>>,
    next_id: u32,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_brush(&mut self, color: Color) -> BrushId {
        let id = BrushId(self.next());
        self.brushes.insert(id, Slot::new(color));
        id
    }

    /// Queue a bitmap; it is loaded on the next [`realize`](Self::realize)
    pub fn add_bitmap(&mut self, path: impl Into<PathBuf>) -> BitmapId {
        let id = BitmapId(self.next());
        self.bitmaps.insert(id, Slot::new(path.into()));
        id
    }

    pub fn brush_color(&self, id: BrushId) -> Option<Color> {
        self.brushes.get(&id).map(|s| s.desc)
    }

    pub fn bitmap_path(&self, id: BitmapId) -> Option<&Path> {
        self.bitmaps.get(&id).map(|s| s.desc.as_path())
    }

    pub fn brush_state(&self, id: BrushId) -> Option<SlotState> {
        self.brushes.get(&id).map(|s| s.state)
    }

    pub fn bitmap_state(&self, id: BitmapId) -> Option<SlotState> {
        self.bitmaps.get(&id).map(|s| s.state)
    }

    pub fn is_brush_realized(&self, id: BrushId) -> bool {
        self.brush_state(id) == Some(SlotState::Realized)
    }

    pub fn is_bitmap_realized(&self, id: BitmapId) -> bool {
        self.bitmap_state(id) == Some(SlotState::Realized)
    }

    /// Create every pending handle. Returns how many were realized.
    pub fn realize(&mut self, loader: &mut dyn ResourceLoader) -> usize {
        let mut realized = 0;
        for (&id, slot) in self.brushes.iter_mut() {
            if slot.state != SlotState::Pending {
                continue;
            }
            if loader.create_brush(id, slot.desc) {
                slot.state = SlotState::Realized;
                realized += 1;
            } else {
                log::warn!("Brush {:?} could not be created", id);
                slot.state = SlotState::Failed;
            }
        }
        for (&id, slot) in self.bitmaps.iter_mut() {
            if slot.state != SlotState::Pending {
                continue;
            }
            if loader.load_bitmap(id, &slot.desc) {
                slot.state = SlotState::Realized;
                realized += 1;
            } else {
                log::warn!("Bitmap {} failed to load; it will not be drawn", slot.desc.display());
                slot.state = SlotState::Failed;
            }
        }
        realized
    }

    /// Forget realized handles (device lost); they are recreated on the
    /// next `realize`
    pub fn discard(&mut self) {
        let slots = self
            .brushes
            .values_mut()
            .map(|s| &mut s.state)
            .chain(self.bitmaps.values_mut().map(|s| &mut s.state));
        for state in slots {
            if *state == SlotState::Realized {
                *state = SlotState::Pending;
            }
        }
        log::info!("Graphics resources discarded");
    }

    /// Give failed loads another chance
    pub fn retry_failed(&mut self) {
        for slot in self.bitmaps.values_mut() {
            if slot.state == SlotState::Failed {
                slot.state = SlotState::Pending;
            }
        }
        for slot in self.brushes.values_mut() {
            if slot.state == SlotState::Failed {
                slot.state = SlotState::Pending;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Loader {
        missing: &'static str,
        brushes: usize,
        bitmaps: usize,
    }

    impl ResourceLoader for Loader {
        fn create_brush(&mut self, _id: BrushId, _color: Color) -> bool {
            self.brushes += 1;
            true
        }

        fn load_bitmap(&mut self, _id: BitmapId, path: &Path) -> bool {
            self.bitmaps += 1;
            path != Path::new(self.missing)
        }
    }

    #[test]
    fn test_color_channels() {
        let c = Color::rgba(0xff8000, 0.5);
        assert_eq!(c.to_rgba(), [1.0, 128.0 / 255.0, 0.0, 0.5]);
        assert_eq!(c.to_bgr(), 0x0080ff);
    }

    #[test]
    fn test_realize_discard_cycle() {
        let mut res = Resources::new();
        let brush = res.add_brush(colors::RED);
        let good = res.add_bitmap("ship.png");
        let bad = res.add_bitmap("missing.png");
        assert!(!res.is_brush_realized(brush));

        let mut loader = Loader {
            missing: "missing.png",
            brushes: 0,
            bitmaps: 0,
        };
        assert_eq!(res.realize(&mut loader), 2);
        assert!(res.is_brush_realized(brush));
        assert!(res.is_bitmap_realized(good));
        assert_eq!(res.bitmap_state(bad), Some(SlotState::Failed));

        // Nothing pending: second pass is a no-op
        assert_eq!(res.realize(&mut loader), 0);
        assert_eq!(loader.bitmaps, 2);

        res.discard();
        assert!(!res.is_brush_realized(brush));
        assert_eq!(res.bitmap_state(bad), Some(SlotState::Failed));
        assert_eq!(res.realize(&mut loader), 2);
        assert_eq!(loader.brushes, 2);

        res.retry_failed();
        assert_eq!(res.bitmap_state(bad), Some(SlotState::Pending));
    }
}
