use foundation::HourOfWeek;
use scene::VisibilityIndex;
use streaming::{Chunk, ChunkStore};

use crate::layer::{HexagonInstance, HexagonLayer, HexagonStyle, LayerId};

/// Build the full layer set for the current state.
///
/// Pure: the output depends only on the arguments. Every chunk yields one
/// layer, hidden ones included, and elevation is the raw series value at
/// `time`.
pub fn render(
    store: &ChunkStore,
    visibility: &VisibilityIndex,
    time: HourOfWeek,
    style: &HexagonStyle,
) -> Vec<HexagonLayer> {
    store
        .iter()
        .map(|(index, chunk)| render_chunk(index, chunk, visibility.is_visible(index), time, style))
        .collect()
}

fn render_chunk(
    index: usize,
    chunk: &Chunk,
    visible: bool,
    time: HourOfWeek,
    style: &HexagonStyle,
) -> HexagonLayer {
    let data = chunk
        .records
        .iter()
        .map(|record| {
            let value = record.value_at(time);
            HexagonInstance {
                cell: record.cell,
                fill_color: style.scheme.fill_color(record, time),
                elevation: value,
                tooltip: format!("score = {value}"),
            }
        })
        .collect();

    HexagonLayer {
        id: LayerId(index),
        visible,
        pickable: style.pickable,
        filled: style.filled,
        extruded: style.extruded,
        wireframe: style.wireframe,
        elevation_scale: style.elevation_scale,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::layer::{HexagonStyle, LayerId};
    use crate::symbology::{CategoryPalette, ColorScheme, GradientPalette};
    use foundation::{Cell, HourOfWeek, Viewport};
    use pretty_assertions::assert_eq;
    use scene::{H3Grid, HexGrid, VisibilityIndex};
    use streaming::{CellRecord, Chunk, ChunkStore};

    fn record(cell: Cell, seed: f32, category: i32) -> CellRecord {
        CellRecord {
            cell,
            series: (0..168).map(|i| seed + i as f32 * 0.25).collect(),
            category,
        }
    }

    fn store_near_copenhagen() -> (ChunkStore, Cell) {
        let coarse = H3Grid.cell_at(55.6, 12.6, 4).unwrap();
        let fine_a = H3Grid.cell_at(55.6, 12.6, 10).unwrap();
        let fine_b = H3Grid.cell_at(55.62, 12.58, 10).unwrap();

        let mut store = ChunkStore::new();
        store.append(
            coarse,
            Chunk::new(vec![record(fine_a, 1.0, 0), record(fine_b, 7.5, -1)]),
        );
        (store, coarse)
    }

    #[test]
    fn elevation_is_exact_series_value_for_every_time() {
        let (store, _) = store_near_copenhagen();
        let vis = VisibilityIndex::new(4);
        let style = HexagonStyle::default();

        for t in 0..168 {
            let time = HourOfWeek::new(t).unwrap();
            let layers = render(&store, &vis, time, &style);
            let chunk = store.get(0).unwrap();
            for (inst, rec) in layers[0].data.iter().zip(chunk.records.iter()) {
                assert_eq!(inst.elevation, rec.series[t as usize]);
            }
        }
    }

    #[test]
    fn one_layer_per_chunk_with_visibility_flag() {
        let (mut store, coarse) = store_near_copenhagen();
        let far = H3Grid.cell_at(40.7, -74.0, 4).unwrap();
        store.append(far, Chunk::default());

        let mut vis = VisibilityIndex::new(4);
        vis.recompute(&Viewport::new(55.6, 12.6, 10.0), &store, &H3Grid);

        let layers = render(&store, &vis, HourOfWeek::default(), &HexagonStyle::default());
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].id, LayerId(0));
        assert!(layers[0].visible);
        assert_eq!(layers[0].len(), 2);
        assert!(!layers[1].visible);
        assert!(layers[1].is_empty());
        assert_eq!(store.lookup(coarse), Some(0));
    }

    #[test]
    fn render_is_pure() {
        let (store, _) = store_near_copenhagen();
        let vis = VisibilityIndex::new(4);
        let style = HexagonStyle::default();
        let time = HourOfWeek::new(62).unwrap();
        assert_eq!(
            render(&store, &vis, time, &style),
            render(&store, &vis, time, &style)
        );
    }

    #[test]
    fn category_scheme_colors_by_type_with_fallback() {
        let (store, _) = store_near_copenhagen();
        let palette = CategoryPalette::default();
        let style = HexagonStyle::new(ColorScheme::ByCategory(palette.clone()));
        let layers = render(&store, &VisibilityIndex::new(4), HourOfWeek::default(), &style);

        assert_eq!(layers[0].data[0].fill_color, palette.color_for(0));
        assert_eq!(layers[0].data[1].fill_color, palette.fallback());
    }

    #[test]
    fn series_scheme_quantizes_current_value() {
        let (store, _) = store_near_copenhagen();
        let colors: Vec<[u8; 4]> = (0..10).map(|i| [i * 10, 0, 0, 255]).collect();
        let style = HexagonStyle::new(ColorScheme::BySeries(
            GradientPalette::from_colors(colors).unwrap(),
        ));
        // Record b at t=4: 7.5 + 1.0 = 8.5 -> slot 8.
        let layers = render(
            &store,
            &VisibilityIndex::new(4),
            HourOfWeek::new(4).unwrap(),
            &style,
        );
        assert_eq!(layers[0].data[1].fill_color, [80, 0, 0, 255]);
        // Record a at t=4: 1.0 + 1.0 = 2.0 -> slot 2.
        assert_eq!(layers[0].data[0].fill_color, [20, 0, 0, 255]);
    }

    #[test]
    fn tooltip_reports_current_score() {
        let (store, _) = store_near_copenhagen();
        let layers = render(
            &store,
            &VisibilityIndex::new(4),
            HourOfWeek::new(2).unwrap(),
            &HexagonStyle::default(),
        );
        assert_eq!(layers[0].data[0].tooltip, "score = 1.5");
    }

    #[test]
    fn short_series_renders_zero_instead_of_panicking() {
        let coarse = H3Grid.cell_at(55.6, 12.6, 4).unwrap();
        let fine = H3Grid.cell_at(55.6, 12.6, 10).unwrap();
        let mut store = ChunkStore::new();
        store.append(
            coarse,
            Chunk::new(vec![CellRecord {
                cell: fine,
                series: vec![3.0],
                category: 0,
            }]),
        );

        let layers = render(
            &store,
            &VisibilityIndex::new(4),
            HourOfWeek::new(62).unwrap(),
            &HexagonStyle::default(),
        );
        assert_eq!(layers[0].data[0].elevation, 0.0);
        assert_eq!(layers[0].data[0].tooltip, "score = 0");
    }
}
