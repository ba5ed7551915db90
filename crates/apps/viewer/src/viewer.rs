use foundation::{Clock, HourOfWeek, SystemClock, TimeRangeError, TimeState, Viewport};
use layers::labels::{coordinate_label, time_label};
use layers::{HexagonStyle, render};
use scene::{H3Grid, VisibilityIndex};
use streaming::{ChunkArrival, ChunkStore, LoadError};
use tracing::{debug, info, warn};

use crate::camera::{Camera, ViewportEvent};
use crate::controls::{Controls, UiEvent};
use crate::renderer::Renderer;

/// Everything the render pass reads.
#[derive(Debug)]
pub struct ViewerState {
    pub store: ChunkStore,
    pub visibility: VisibilityIndex,
    pub time: TimeState,
    pub camera: Camera,
}

impl ViewerState {
    pub fn new(camera: Camera, chunk_resolution: u8, time: TimeState) -> Self {
        Self {
            store: ChunkStore::new(),
            visibility: VisibilityIndex::new(chunk_resolution),
            time,
            camera,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the viewer state and re-renders after every mutation.
///
/// All handlers run on one task; chunk arrivals, time changes and viewport
/// events are serialized by the caller.
pub struct Viewer<R, C, K = SystemClock> {
    state: ViewerState,
    style: HexagonStyle,
    grid: H3Grid,
    clock: K,
    renderer: R,
    controls: C,
    passes: u64,
}

impl<R: Renderer, C: Controls> Viewer<R, C, SystemClock> {
    pub fn new(state: ViewerState, style: HexagonStyle, renderer: R, controls: C) -> Self {
        Self::with_clock(state, style, renderer, controls, SystemClock)
    }
}

impl<R: Renderer, C: Controls, K: Clock> Viewer<R, C, K> {
    pub fn with_clock(
        state: ViewerState,
        style: HexagonStyle,
        renderer: R,
        controls: C,
        clock: K,
    ) -> Self {
        Self {
            state,
            style,
            grid: H3Grid,
            clock,
            renderer,
            controls,
            passes: 0,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn controls(&self) -> &C {
        &self.controls
    }

    pub fn render_passes(&self) -> u64 {
        self.passes
    }

    pub fn time(&self) -> HourOfWeek {
        self.state.time.current()
    }

    pub fn viewport(&self) -> Viewport {
        self.state.camera.viewport()
    }

    /// Rebuild every layer from the current state and hand them over.
    pub fn render_pass(&mut self) {
        let time = self.state.time.current();
        let layers = render(&self.state.store, &self.state.visibility, time, &self.style);
        debug!(pass = self.passes, layers = layers.len(), %time, "render");
        self.renderer.set_layers(layers);
        self.controls.show_time(time, &time_label(time));
        self.passes += 1;
    }

    /// Store a loaded chunk and re-render. Failed chunks are logged and dropped.
    ///
    /// The new chunk stays hidden until the next viewport event recomputes
    /// visibility.
    pub fn on_chunk(&mut self, arrival: ChunkArrival) -> Option<usize> {
        match arrival.result {
            Ok(chunk) => {
                let index = self.state.store.append(arrival.cell, chunk);
                self.state.visibility.grow(self.state.store.len());
                debug!(cell = %arrival.cell, index, "chunk stored");
                self.render_pass();
                Some(index)
            }
            Err(err) => {
                warn!(cell = %arrival.cell, "chunk dropped: {err}");
                None
            }
        }
    }

    /// Move the time slider. Out-of-range values leave the state untouched
    /// and skip the render.
    pub fn set_time(&mut self, hour: i64) -> Result<HourOfWeek, TimeRangeError> {
        let time = self.state.time.set(hour)?;
        self.render_pass();
        Ok(time)
    }

    pub fn set_time_to_now(&mut self) -> HourOfWeek {
        let time = self.state.time.set_to_now(&self.clock);
        self.render_pass();
        time
    }

    /// Apply the camera's handling first, then recompute visibility from the
    /// resulting view.
    pub fn on_viewport_event(&mut self, event: &ViewportEvent) -> Viewport {
        let viewport = self.state.camera.handle(event);
        self.state
            .visibility
            .recompute(&viewport, &self.state.store, &self.grid);
        debug!(
            kind = ?event.kind,
            zoom = viewport.zoom,
            visible = self.state.visibility.visible_count(),
            "viewport changed"
        );
        self.controls.show_coordinates(&coordinate_label(&viewport));
        self.render_pass();
        viewport
    }

    pub fn handle_ui(&mut self, event: UiEvent) -> Flow {
        let current = self.viewport();
        match event {
            UiEvent::SetTime(hour) => {
                if let Err(err) = self.set_time(hour) {
                    self.controls.show_error(&err.to_string());
                }
            }
            UiEvent::Now => {
                self.set_time_to_now();
            }
            UiEvent::Pan {
                latitude,
                longitude,
            } => {
                let next = Viewport::new(latitude, longitude, current.zoom);
                self.on_viewport_event(&ViewportEvent::pan(next));
            }
            UiEvent::Zoom(zoom) => {
                let next = Viewport::new(current.latitude, current.longitude, zoom);
                self.on_viewport_event(&ViewportEvent::zoom(next));
            }
            UiEvent::Pinch(zoom) => {
                let next = Viewport::new(current.latitude, current.longitude, zoom);
                self.on_viewport_event(&ViewportEvent::pinch(next));
            }
            UiEvent::Quit => {
                info!("quit requested");
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    pub fn show_load_error(&mut self, err: &LoadError) {
        self.controls.show_error(&format!("failed to load data: {err}"));
    }
}
