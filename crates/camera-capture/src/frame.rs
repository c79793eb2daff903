//! Video frame types and color derivation

use image::RgbImage;

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Create a frame filled with a single color
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width * height * 3) as usize)
            .collect();
        Self::new(data, width, height, 0, 0)
    }

    /// Wrap a decoded `image` buffer
    pub fn from_rgb_image(img: RgbImage, sequence: u32) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, 0, sequence)
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        self.data
            .get(idx..idx + 3)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Overwrite a pixel; out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        if let Some(p) = self.data.get_mut(idx..idx + 3) {
            p.copy_from_slice(&rgb);
        }
    }

    /// Paint a rectangle, clipped to the frame
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, rgb: [u8; 3]) {
        for row in y..y.saturating_add(h).min(self.height) {
            for col in x..x.saturating_add(w).min(self.width) {
                self.set_pixel(col, row, rgb);
            }
        }
    }

    /// Convert to grayscale
    pub fn to_grayscale(&self) -> Vec<u8> {
        self.data
            .chunks_exact(3)
            .map(|p| luminance([p[0], p[1], p[2]]))
            .collect()
    }

    /// Convert to 8-bit HSV (H in [0, 180], S and V in [0, 255])
    pub fn to_hsv(&self) -> Vec<[u8; 3]> {
        self.data
            .chunks_exact(3)
            .map(|p| rgb_to_hsv([p[0], p[1], p[2]]))
            .collect()
    }

    /// Iterate the pixels of a region, clipped to the frame bounds.
    ///
    /// Yields `(x, y, rgb)` in row-major order. A region lying completely
    /// outside the frame yields nothing.
    pub fn region(&self, x: u32, y: u32, w: u32, h: u32) -> impl Iterator<Item = (u32, u32, [u8; 3])> + '_ {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        (y.min(y_end)..y_end).flat_map(move |row| {
            (x.min(x_end)..x_end).filter_map(move |col| {
                self.get_pixel(col, row).map(|rgb| (col, row, rgb))
            })
        })
    }

    /// Number of pixels a region covers once clipped to the frame
    pub fn clipped_area(&self, x: u32, y: u32, w: u32, h: u32) -> u64 {
        let cw = x.saturating_add(w).min(self.width).saturating_sub(x);
        let ch = y.saturating_add(h).min(self.height).saturating_sub(y);
        cw as u64 * ch as u64
    }

    /// Resize frame (nearest neighbour)
    pub fn resize(&self, new_width: u32, new_height: u32) -> VideoFrame {
        if self.width == 0 || self.height == 0 {
            return VideoFrame::filled(new_width, new_height, [0, 0, 0]);
        }

        let mut resized = Vec::with_capacity((new_width * new_height * 3) as usize);

        let x_ratio = self.width as f32 / new_width as f32;
        let y_ratio = self.height as f32 / new_height as f32;

        for y in 0..new_height {
            for x in 0..new_width {
                let x0 = ((x as f32 * x_ratio).floor() as u32).min(self.width - 1);
                let y0 = ((y as f32 * y_ratio).floor() as u32).min(self.height - 1);
                let pixel = self.get_pixel(x0, y0).unwrap_or([0, 0, 0]);
                resized.extend_from_slice(&pixel);
            }
        }

        VideoFrame {
            data: resized,
            width: new_width,
            height: new_height,
            timestamp_ns: self.timestamp_ns,
            sequence: self.sequence,
        }
    }
}

/// Luminance formula: 0.299*R + 0.587*G + 0.114*B
pub fn luminance(rgb: [u8; 3]) -> u8 {
    let y = rgb[0] as f32 * 0.299 + rgb[1] as f32 * 0.587 + rgb[2] as f32 * 0.114;
    y.round().clamp(0.0, 255.0) as u8
}

/// RGB to 8-bit HSV, hue halved to fit a byte
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(f32::from);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = v - min;

    let s = if v > 0.0 { 255.0 * delta / v } else { 0.0 };

    let h = if delta == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / delta
    } else if v == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    [
        (h / 2.0).round().clamp(0.0, 180.0) as u8,
        s.round().clamp(0.0, 255.0) as u8,
        v as u8,
    ]
}
