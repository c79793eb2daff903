//! Regions of interest and the canonical zone layout

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in frame pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Nominal area (before clipping to a frame)
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// The five classified zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneId {
    /// Upper centre (CM)
    CenterTop,
    /// Middle left (CE)
    CenterLeft,
    /// Middle right (CD)
    CenterRight,
    /// Lower left, just ahead of the wheels (BE)
    RearLeft,
    /// Lower right (BD)
    RearRight,
}

impl ZoneId {
    pub const ALL: [ZoneId; 5] = [
        ZoneId::CenterTop,
        ZoneId::CenterLeft,
        ZoneId::CenterRight,
        ZoneId::RearLeft,
        ZoneId::RearRight,
    ];

    /// Short code shown on the operator display
    pub fn code(self) -> &'static str {
        match self {
            ZoneId::CenterTop => "CM",
            ZoneId::CenterLeft => "CE",
            ZoneId::CenterRight => "CD",
            ZoneId::RearLeft => "BE",
            ZoneId::RearRight => "BD",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

// Zone rectangles measured on a 640x360 frame
const REFERENCE_WIDTH: u64 = 640;
const REFERENCE_HEIGHT: u64 = 360;

const ZONE_TEMPLATE: [(ZoneId, [u32; 4]); 5] = [
    (ZoneId::CenterTop, [247, 8, 145, 106]),
    (ZoneId::CenterLeft, [41, 120, 232, 106]),
    (ZoneId::CenterRight, [367, 120, 232, 106]),
    (ZoneId::RearLeft, [41, 264, 232, 106]),
    (ZoneId::RearRight, [367, 264, 232, 106]),
];

const LINE_STRIP_Y: u32 = 230;
const LINE_STRIP_HEIGHT: u32 = 60;

/// Zone and line-strip rectangles for one frame size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoiLayout {
    zones: [Roi; 5],
    line_strip: Roi,
}

impl RoiLayout {
    /// Scale the reference layout to a frame size
    pub fn for_frame(width: u32, height: u32) -> Self {
        let sx = |v: u32| (v as u64 * width as u64 / REFERENCE_WIDTH) as u32;
        let sy = |v: u32| (v as u64 * height as u64 / REFERENCE_HEIGHT) as u32;

        let mut zones = [Roi::default(); 5];
        for (id, [x, y, w, h]) in ZONE_TEMPLATE {
            zones[id.index()] = Roi::new(sx(x), sy(y), sx(w), sy(h));
        }

        Self {
            zones,
            line_strip: Roi::new(0, sy(LINE_STRIP_Y), width, sy(LINE_STRIP_HEIGHT)),
        }
    }

    pub fn zone(&self, id: ZoneId) -> Roi {
        self.zones[id.index()]
    }

    /// All zones with their ids, in `ZoneId::ALL` order
    pub fn zones(&self) -> impl Iterator<Item = (ZoneId, Roi)> + '_ {
        ZoneId::ALL.iter().map(move |&id| (id, self.zone(id)))
    }

    /// Thin full-width strip used for centroid tracking
    pub fn line_strip(&self) -> Roi {
        self.line_strip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_layout_is_identity() {
        let layout = RoiLayout::for_frame(640, 360);
        assert_eq!(layout.zone(ZoneId::CenterTop), Roi::new(247, 8, 145, 106));
        assert_eq!(layout.zone(ZoneId::RearRight), Roi::new(367, 264, 232, 106));
        assert_eq!(layout.line_strip(), Roi::new(0, 230, 640, 60));
    }

    #[test]
    fn test_layout_scales_with_resolution() {
        let layout = RoiLayout::for_frame(320, 180);
        assert_eq!(layout.zone(ZoneId::CenterLeft), Roi::new(20, 60, 116, 53));
        assert_eq!(layout.line_strip(), Roi::new(0, 115, 320, 30));
    }

    #[test]
    fn test_zone_codes() {
        let codes: Vec<_> = ZoneId::ALL.iter().map(|z| z.code()).collect();
        assert_eq!(codes, vec!["CM", "CE", "CD", "BE", "BD"]);
    }

    #[test]
    fn test_zero_sized_frame_gives_degenerate_rois() {
        let layout = RoiLayout::for_frame(0, 0);
        assert!(layout.zones().all(|(_, roi)| roi.area() == 0));
    }
}
