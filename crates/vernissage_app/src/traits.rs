use crate::context::AppContext;

/// Scene driven by the vernissage runner.
///
/// Every method has a no-op default.  `setup` runs once the window and the
/// device exist; `update` and `draw` run once per frame, in that order.
/// Errors from `setup` or `draw` stop the event loop and are returned from
/// [`App::run`](crate::App::run).
#[allow(unused_variables)]
pub trait VernissageApp {
    fn setup(&mut self, ctx: &mut AppContext) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called after the camera has consumed this frame's input.
    fn update(&mut self, ctx: &mut AppContext) {}

    /// Called with the frame's render pass open.
    fn draw(&mut self, ctx: &mut AppContext) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called after the surface, depth target and camera aspect follow the
    /// new size.
    fn on_resize(&mut self, new_size: (u32, u32), ctx: &mut AppContext) {}
}
