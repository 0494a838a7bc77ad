// src/loader/text_loader.rs
use crate::error::Error;
use crate::map::{TileCell, TileMap, TileSetKey};

fn parse_dimension(token: &str, what: &str) -> Result<usize, Error> {
    token
        .parse::<usize>()
        .map_err(|e| Error::map_format(format!("{what} {token:?} is not a valid size: {e}")))
}

fn parse_tile_index(token: &str, cell: usize) -> Result<u32, Error> {
    token.parse::<u32>().map_err(|e| {
        Error::map_format(format!("tile index {token:?} at cell {cell} is not valid: {e}"))
    })
}

fn parse_tile_set(token: &str, cell: usize) -> Result<TileSetKey, Error> {
    TileSetKey::from_code(token).ok_or_else(|| {
        Error::map_format(format!("unknown tile set code {token:?} at cell {cell}"))
    })
}

/// Decode the text map format. Tokens are separated by any whitespace.
///
/// The body after the two dimensions must hold exactly `width*height` tile
/// indices followed by `width*height` tile set codes. Any other count fails
/// the whole load.
pub fn decode_map_str(src: &str) -> Result<TileMap, Error> {
    let tokens: Vec<&str> = src.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(Error::map_format(format!(
            "expected width and height, found {} token(s)",
            tokens.len()
        )));
    }

    let width = parse_dimension(tokens[0], "width")?;
    let height = parse_dimension(tokens[1], "height")?;
    let area = width
        .checked_mul(height)
        .ok_or_else(|| Error::map_format(format!("map size {width}x{height} overflows")))?;

    let body = &tokens[2..];
    if Some(body.len()) != area.checked_mul(2) {
        return Err(Error::map_format(format!(
            "{width}x{height} map needs {area} tile indices and {area} tile set codes, got {} tokens",
            body.len()
        )));
    }
    let (indices, codes) = body.split_at(area);

    let mut cells = Vec::with_capacity(area);
    for (i, (index, code)) in indices.iter().zip(codes).enumerate() {
        cells.push(TileCell {
            tile_index: parse_tile_index(index, i)?,
            tile_set: Some(parse_tile_set(code, i)?),
        });
    }

    TileMap::from_cells(width, height, cells)
}
