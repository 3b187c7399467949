//! Address-space rules for atlas assets.
//!
//! An atlas is a grid of `size.cols × size.rows` tiles. Each entry of its map names a
//! `sprite:` asset and where that sprite sits, either as grid cells or as raw pixels.

use pigment_api::{ApiError, ApiResult, AssetKind, Atlas, AtlasPosition, AtlasSlot, TypedId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

pub trait AtlasAddressing {
    /// Checks the atlas id, its size and every map entry.
    fn validate(&self) -> ApiResult<()>;

    /// Whether `sub` is placed in this atlas at `version`.
    fn positioned_at(&self, sub: &str, version: &str) -> bool;

    /// Sprites placed at `version`, in map order.
    fn sprites_at(&self, version: &str) -> Vec<&str>;

    /// Pixel rectangle of `sub` for tiles of `tile_size` pixels.
    ///
    /// `None` when `sub` is unknown or its area is inverted or overflows `u32`.
    fn pixel_rect(&self, sub: &str, tile_size: u32) -> Option<PixelRect>;
}

fn invalid(atlas: &Atlas, msg: impl std::fmt::Display) -> ApiError {
    ApiError::Validation(format!("atlas {}: {}", atlas.id, msg))
}

fn check_slot(atlas: &Atlas, key: &str, slot: &AtlasSlot) -> ApiResult<()> {
    let sub: TypedId = key.parse()?;
    if sub.kind != AssetKind::Sprite {
        return Err(invalid(atlas, format!("map key '{}' is not a sprite id", key)));
    }

    let size = atlas.size;
    match slot.position {
        AtlasPosition::Cell { col, row } => {
            if col >= size.cols || row >= size.rows {
                return Err(invalid(
                    atlas,
                    format!("'{}' at ({}, {}) is outside the grid", key, col, row),
                ));
            }
        }
        AtlasPosition::Range {
            col_start,
            col_end,
            row_start,
            row_end,
        } => {
            if col_start > col_end || row_start > row_end {
                return Err(invalid(atlas, format!("'{}' has an inverted range", key)));
            }
            if col_end >= size.cols || row_end >= size.rows {
                return Err(invalid(
                    atlas,
                    format!("'{}' extends outside the grid", key),
                ));
            }
        }
        AtlasPosition::Pixels { width, height, .. } => {
            if width == 0 || height == 0 {
                return Err(invalid(atlas, format!("'{}' has an empty pixel area", key)));
            }
        }
    }
    Ok(())
}

impl AtlasAddressing for Atlas {
    fn validate(&self) -> ApiResult<()> {
        let id = self.typed_id()?;
        if id.kind != AssetKind::Atlas {
            return Err(invalid(self, "id is not of kind atlas"));
        }
        if self.size.cols == 0 || self.size.rows == 0 {
            return Err(invalid(self, "size must be at least 1×1"));
        }
        for (key, slot) in &self.map {
            check_slot(self, key, slot)?;
        }
        Ok(())
    }

    fn positioned_at(&self, sub: &str, version: &str) -> bool {
        self.map
            .get(sub)
            .map(|slot| slot.versions.applies_to(version))
            .unwrap_or(false)
    }

    fn sprites_at(&self, version: &str) -> Vec<&str> {
        self.map
            .iter()
            .filter(|(_, slot)| slot.versions.applies_to(version))
            .map(|(key, _)| key.as_str())
            .collect()
    }

    fn pixel_rect(&self, sub: &str, tile_size: u32) -> Option<PixelRect> {
        match self.map.get(sub)?.position {
            AtlasPosition::Cell { col, row } => Some(PixelRect {
                x: col.checked_mul(tile_size)?,
                y: row.checked_mul(tile_size)?,
                width: tile_size,
                height: tile_size,
            }),
            AtlasPosition::Range {
                col_start,
                col_end,
                row_start,
                row_end,
            } => {
                let cols = col_end.checked_sub(col_start)?.checked_add(1)?;
                let rows = row_end.checked_sub(row_start)?.checked_add(1)?;
                Some(PixelRect {
                    x: col_start.checked_mul(tile_size)?,
                    y: row_start.checked_mul(tile_size)?,
                    width: cols.checked_mul(tile_size)?,
                    height: rows.checked_mul(tile_size)?,
                })
            }
            AtlasPosition::Pixels {
                x,
                y,
                width,
                height,
            } => Some(PixelRect {
                x,
                y,
                width,
                height,
            }),
        }
    }
}
