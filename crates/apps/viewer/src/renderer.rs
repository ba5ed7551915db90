use std::io::Write;

use layers::HexagonLayer;
use serde::Serialize;
use tracing::{error, info};

/// Receives the complete layer set on every render pass.
///
/// There is no diffing: implementations get every layer each time and are
/// responsible for handling re-submission efficiently.
pub trait Renderer {
    fn set_layers(&mut self, layers: Vec<HexagonLayer>);
}

impl<T: Renderer + ?Sized> Renderer for Box<T> {
    fn set_layers(&mut self, layers: Vec<HexagonLayer>) {
        (**self).set_layers(layers)
    }
}

#[derive(Serialize)]
struct Frame<'a> {
    pass: u64,
    layers: &'a [HexagonLayer],
}

/// Writes one JSON document per pass, newline separated.
#[derive(Debug)]
pub struct JsonLinesRenderer<W> {
    out: W,
    pass: u64,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, pass: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, layers: &[HexagonLayer]) -> std::io::Result<()> {
        let frame = Frame {
            pass: self.pass,
            layers,
        };
        serde_json::to_writer(&mut self.out, &frame)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn set_layers(&mut self, layers: Vec<HexagonLayer>) {
        if let Err(err) = self.write_frame(&layers) {
            error!(pass = self.pass, "render output failed: {err}");
        }
        self.pass += 1;
    }
}

/// Logs a one-line summary of each pass.
#[derive(Debug, Default)]
pub struct SummaryRenderer {
    pass: u64,
}

impl Renderer for SummaryRenderer {
    fn set_layers(&mut self, layers: Vec<HexagonLayer>) {
        let visible = layers.iter().filter(|l| l.visible).count();
        let hexagons: usize = layers.iter().filter(|l| l.visible).map(|l| l.len()).sum();
        info!(
            pass = self.pass,
            layers = layers.len(),
            visible,
            hexagons,
            "render pass"
        );
        self.pass += 1;
    }
}
