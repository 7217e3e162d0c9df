//! Layered surface stack with staged push/pop and per-tick input routing.
//!
//! The top of the stack is updated first. Each surface decides whether the
//! ones beneath it update too and whether they stay visible beneath it.
//! Pushes and pops requested while the stack is being traversed are staged
//! and applied once the traversal is over: pops first, then pushes.

use std::fmt;

use crate::assets::AssetStore;
use crate::geometry::Point;
use crate::input::{InputEvent, TickInput};
use crate::render::DrawList;
use crate::{MetronomeError, Result};

/// One layer of the user interface.
///
/// `S` is the application state every surface reads and mutates.
pub trait Surface<S> {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Declares the assets this surface draws with. Called once, when the
    /// surface is pushed.
    fn load_assets(&mut self, _assets: &mut AssetStore) -> Result<()> {
        Ok(())
    }

    /// Handles one tick. Returns `true` when the surface below should be
    /// updated as well.
    fn update(&mut self, ctx: &mut SurfaceContext<'_, S>, input: &TickInput) -> bool;

    /// Whether the surface below stays visible under this one.
    fn draws_lower(&self) -> bool;

    fn draw(&self, state: &S, out: &mut DrawList);

    /// Whether `point` lies on this surface.
    fn hit_test(&self, point: Point) -> bool;

    /// Confirms the surface, e.g. from an Ok button or the Enter key.
    fn handle_ok(&mut self, _ctx: &mut SurfaceContext<'_, S>) {}

    /// Dismisses the surface, e.g. from a Close button or the Escape key.
    fn handle_close(&mut self, _ctx: &mut SurfaceContext<'_, S>) {}
}

/// Stack mutations requested during a traversal.
pub struct Staged<S> {
    pushes: Vec<Box<dyn Surface<S>>>,
    pops: usize,
}

impl<S> Default for Staged<S> {
    fn default() -> Self {
        Self {
            pushes: Vec::new(),
            pops: 0,
        }
    }
}

impl<S> Staged<S> {
    pub fn push(&mut self, surface: Box<dyn Surface<S>>) {
        tracing::debug!(surface = surface.name(), "staged push");
        self.pushes.push(surface);
    }

    pub fn pop(&mut self, count: usize) {
        tracing::debug!(count, "staged pop");
        self.pops += count;
    }

    pub fn is_empty(&self) -> bool {
        self.pushes.is_empty() && self.pops == 0
    }

    pub fn pops(&self) -> usize {
        self.pops
    }

    /// Names of the staged pushes, in staging order.
    pub fn pushed(&self) -> Vec<&'static str> {
        self.pushes.iter().map(|surface| surface.name()).collect()
    }
}

impl<S> fmt::Debug for Staged<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pushes: Vec<_> = self.pushes.iter().map(|surface| surface.name()).collect();
        f.debug_struct("Staged")
            .field("pushes", &pushes)
            .field("pops", &self.pops)
            .finish()
    }
}

/// What a surface can reach while it is updated.
pub struct SurfaceContext<'a, S> {
    pub state: &'a mut S,
    staged: &'a mut Staged<S>,
}

impl<'a, S> SurfaceContext<'a, S> {
    pub fn new(state: &'a mut S, staged: &'a mut Staged<S>) -> Self {
        Self { state, staged }
    }

    /// Pushes `surface` once the current traversal is over.
    pub fn push(&mut self, surface: Box<dyn Surface<S>>) {
        self.staged.push(surface);
    }

    /// Pops `count` surfaces once the current traversal is over.
    pub fn pop(&mut self, count: usize) {
        self.staged.pop(count);
    }
}

/// Owns the surface stack. The bottom surface is never removed.
pub struct ScreenManager<S> {
    stack: Vec<Box<dyn Surface<S>>>,
    staged: Staged<S>,
    assets: AssetStore,
}

impl<S> ScreenManager<S> {
    /// Creates a stack holding only `base`.
    pub fn new(base: Box<dyn Surface<S>>, assets: AssetStore) -> Result<Self> {
        let mut manager = Self {
            stack: Vec::new(),
            staged: Staged::default(),
            assets,
        };
        manager.install(base)?;
        Ok(manager)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Surface names from bottom to top.
    pub fn names(&self) -> Vec<&'static str> {
        self.stack.iter().map(|surface| surface.name()).collect()
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn stage_push(&mut self, surface: Box<dyn Surface<S>>) {
        self.staged.push(surface);
    }

    pub fn stage_pop(&mut self, count: usize) {
        self.staged.pop(count);
    }

    /// Name of the topmost surface under `point`.
    pub fn surface_at(&self, point: Point) -> Option<&'static str> {
        self.stack
            .iter()
            .rev()
            .find(|surface| surface.hit_test(point))
            .map(|surface| surface.name())
    }

    /// Whether the surface at `depth` (0 = top) lies under `point`.
    pub fn is_under(&self, depth: usize, point: Point) -> bool {
        self.stack
            .iter()
            .rev()
            .nth(depth)
            .is_some_and(|surface| surface.hit_test(point))
    }

    /// Runs the update pass for one tick, then applies staged mutations.
    ///
    /// The mouse event goes to the first updated surface whose hit test
    /// contains the pointer; every other surface sees [`InputEvent::Idle`]
    /// on the mouse channel. The keyboard event reaches every updated
    /// surface.
    pub fn update(&mut self, state: &mut S, input: &TickInput) -> Result<()> {
        let mut mouse_taken = false;
        let mut visited = Vec::with_capacity(self.stack.len());

        while let Some(mut surface) = self.stack.pop() {
            let mouse = match input.mouse.position() {
                Some(point) if !mouse_taken && surface.hit_test(point) => {
                    mouse_taken = true;
                    input.mouse.clone()
                }
                Some(_) => InputEvent::Idle,
                None => input.mouse.clone(),
            };
            let routed = TickInput {
                mouse,
                keyboard: input.keyboard.clone(),
            };

            let mut ctx = SurfaceContext::new(&mut *state, &mut self.staged);
            let update_lower = surface.update(&mut ctx, &routed);
            visited.push(surface);
            if !update_lower {
                break;
            }
        }

        while let Some(surface) = visited.pop() {
            self.stack.push(surface);
        }

        self.apply_staged()
    }

    /// Applies staged mutations without running an update pass.
    pub fn apply_staged(&mut self) -> Result<()> {
        if self.staged.is_empty() {
            return Ok(());
        }
        let Staged { pushes, pops } = std::mem::take(&mut self.staged);

        let available = self.stack.len();
        if pops >= available {
            return Err(MetronomeError::StackUnderflow {
                requested: pops,
                available,
            });
        }
        for surface in self.stack.drain(available - pops..) {
            tracing::debug!(surface = surface.name(), "popped");
        }
        for surface in pushes {
            self.install(surface)?;
        }
        Ok(())
    }

    fn install(&mut self, mut surface: Box<dyn Surface<S>>) -> Result<()> {
        surface.load_assets(&mut self.assets)?;
        tracing::debug!(surface = surface.name(), depth = self.stack.len(), "pushed");
        self.stack.push(surface);
        Ok(())
    }

    /// Paints the visible surfaces, lowest first.
    ///
    /// The top surface is always visible; each surface that draws lower
    /// exposes the one beneath it.
    pub fn draw(&mut self, state: &S, out: &mut DrawList) {
        let Some(top) = self.stack.pop() else {
            return;
        };
        let mut visible = vec![top];
        while visible.last().is_some_and(|surface| surface.draws_lower()) {
            match self.stack.pop() {
                Some(surface) => visible.push(surface),
                None => break,
            }
        }

        while let Some(surface) = visible.pop() {
            surface.draw(state, out);
            self.stack.push(surface);
        }
    }
}

impl<S> fmt::Debug for ScreenManager<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenManager")
            .field("stack", &self.names())
            .field("staged", &self.staged)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::input::Key;
    use crate::render::{Color, Font};

    /// Every update each probe saw, in call order.
    #[derive(Debug, Default)]
    struct Log {
        updates: Vec<(&'static str, InputEvent, InputEvent)>,
    }

    struct Probe {
        name: &'static str,
        area: Rect,
        update_lower: bool,
        draw_lower: bool,
        pops: usize,
        push: Option<Box<dyn Surface<Log>>>,
    }

    impl Probe {
        fn new(name: &'static str, area: Rect) -> Self {
            Self {
                name,
                area,
                update_lower: true,
                draw_lower: true,
                pops: 0,
                push: None,
            }
        }

        fn update_lower(mut self, value: bool) -> Self {
            self.update_lower = value;
            self
        }

        fn draw_lower(mut self, value: bool) -> Self {
            self.draw_lower = value;
            self
        }

        fn stages(mut self, pops: usize, push: Option<Probe>) -> Self {
            self.pops = pops;
            self.push = push.map(|probe| Box::new(probe) as Box<dyn Surface<Log>>);
            self
        }

        fn boxed(self) -> Box<dyn Surface<Log>> {
            Box::new(self)
        }
    }

    impl Surface<Log> for Probe {
        fn name(&self) -> &'static str {
            self.name
        }

        fn update(&mut self, ctx: &mut SurfaceContext<'_, Log>, input: &TickInput) -> bool {
            ctx.state
                .updates
                .push((self.name, input.mouse.clone(), input.keyboard.clone()));
            if self.pops > 0 {
                ctx.pop(std::mem::take(&mut self.pops));
            }
            if let Some(surface) = self.push.take() {
                ctx.push(surface);
            }
            self.update_lower
        }

        fn draws_lower(&self) -> bool {
            self.draw_lower
        }

        fn draw(&self, _state: &Log, out: &mut DrawList) {
            out.text(self.name, Point::ZERO, Font::Small, Color::White);
        }

        fn hit_test(&self, point: Point) -> bool {
            self.area.contains(point)
        }
    }

    const FULL: Rect = Rect::new(0, 0, 900, 600);

    fn click(x: i32, y: i32) -> TickInput {
        TickInput {
            mouse: InputEvent::LeftButtonDown(Point::new(x, y)),
            keyboard: InputEvent::Idle,
        }
    }

    fn manager(surfaces: Vec<Probe>) -> ScreenManager<Log> {
        let mut surfaces = surfaces.into_iter();
        let base = surfaces.next().expect("at least one surface");
        let mut manager = ScreenManager::new(base.boxed(), AssetStore::new()).unwrap();
        for surface in surfaces {
            manager.stage_push(surface.boxed());
        }
        manager.update(&mut Log::default(), &TickInput::idle()).unwrap();
        manager
    }

    fn painted(manager: &mut ScreenManager<Log>) -> Vec<String> {
        let mut out = DrawList::new();
        manager.draw(&Log::default(), &mut out);
        out.texts().map(str::to_string).collect()
    }

    #[test]
    fn update_stops_at_first_blocking_surface() {
        let mut manager = manager(vec![
            Probe::new("a", FULL),
            Probe::new("b", FULL).update_lower(false),
            Probe::new("c", Rect::new(100, 100, 50, 50)).update_lower(false),
        ]);
        let mut log = Log::default();
        manager.update(&mut log, &click(10, 10)).unwrap();

        assert_eq!(log.updates.len(), 1);
        assert_eq!(log.updates[0].0, "c");
        assert_eq!(log.updates[0].1, InputEvent::Idle);
        assert_eq!(manager.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn mouse_outside_every_surface_reaches_nobody() {
        let mut manager = manager(vec![
            Probe::new("a", Rect::new(0, 0, 10, 10)),
            Probe::new("b", Rect::new(20, 20, 10, 10)).update_lower(false),
            Probe::new("c", Rect::new(100, 100, 50, 50)),
        ]);
        let mut log = Log::default();
        manager.update(&mut log, &click(500, 500)).unwrap();

        let seen: Vec<_> = log.updates.iter().map(|(name, mouse, _)| (*name, mouse.clone())).collect();
        assert_eq!(seen, vec![("c", InputEvent::Idle), ("b", InputEvent::Idle)]);
    }

    #[test]
    fn mouse_goes_to_first_surface_containing_pointer() {
        let mut manager = manager(vec![
            Probe::new("a", FULL),
            Probe::new("b", Rect::new(0, 0, 200, 600)),
            Probe::new("c", Rect::new(300, 300, 50, 50)),
        ]);
        let mut log = Log::default();
        manager.update(&mut log, &click(10, 10)).unwrap();

        let mice: Vec<_> = log.updates.iter().map(|(_, mouse, _)| mouse.clone()).collect();
        assert_eq!(
            mice,
            vec![
                InputEvent::Idle,
                InputEvent::LeftButtonDown(Point::new(10, 10)),
                InputEvent::Idle,
            ]
        );
    }

    #[test]
    fn keystrokes_are_never_gated() {
        let mut manager = manager(vec![
            Probe::new("a", FULL),
            Probe::new("b", Rect::new(0, 0, 1, 1)),
        ]);
        let stroke = InputEvent::Keystroke {
            keys: vec![Key::Enter],
            shift: false,
        };
        let input = TickInput {
            mouse: InputEvent::Hover(Point::new(400, 400)),
            keyboard: stroke.clone(),
        };
        let mut log = Log::default();
        manager.update(&mut log, &input).unwrap();

        assert!(log.updates.iter().all(|(_, _, keyboard)| *keyboard == stroke));
        assert_eq!(log.updates.len(), 2);
    }

    #[test]
    fn staged_pops_apply_before_pushes() {
        let mut manager = manager(vec![
            Probe::new("a", FULL),
            Probe::new("b", FULL).update_lower(false),
            Probe::new("c", FULL).stages(2, Some(Probe::new("d", FULL))),
        ]);
        let mut log = Log::default();
        manager.update(&mut log, &TickInput::idle()).unwrap();

        // Staging does not change the traversal that staged it.
        let visited: Vec<_> = log.updates.iter().map(|(name, _, _)| *name).collect();
        assert_eq!(visited, vec!["c", "b"]);
        assert_eq!(manager.names(), vec!["a", "d"]);
    }

    #[test]
    fn popping_the_base_surface_is_an_error() {
        let mut manager = manager(vec![
            Probe::new("a", FULL),
            Probe::new("b", FULL).stages(2, None),
        ]);
        let err = manager
            .update(&mut Log::default(), &TickInput::idle())
            .unwrap_err();
        assert!(matches!(
            err,
            MetronomeError::StackUnderflow {
                requested: 2,
                available: 2
            }
        ));
    }

    #[test]
    fn externally_staged_mutations_apply_on_next_update() {
        let mut manager = manager(vec![Probe::new("a", FULL)]);
        manager.stage_push(Probe::new("b", FULL).boxed());
        assert_eq!(manager.len(), 1);

        manager.update(&mut Log::default(), &TickInput::idle()).unwrap();
        assert_eq!(manager.names(), vec!["a", "b"]);

        manager.stage_pop(1);
        manager.update(&mut Log::default(), &TickInput::idle()).unwrap();
        assert_eq!(manager.names(), vec!["a"]);
    }

    #[test]
    fn blocking_surface_hides_lower_ones() {
        let mut manager = manager(vec![
            Probe::new("a", FULL),
            Probe::new("b", FULL).draw_lower(false),
        ]);
        assert_eq!(painted(&mut manager), vec!["b"]);
        assert_eq!(manager.names(), vec!["a", "b"]);
    }

    #[test]
    fn transparent_surface_paints_over_lower_ones() {
        let mut manager = manager(vec![
            Probe::new("a", FULL),
            Probe::new("b", FULL).draw_lower(false),
            Probe::new("c", FULL),
            Probe::new("d", FULL),
        ]);
        assert_eq!(painted(&mut manager), vec!["b", "c", "d"]);
        assert_eq!(manager.names(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn hit_testing_by_depth_and_point() {
        let manager = manager(vec![
            Probe::new("a", FULL),
            Probe::new("side", Rect::new(0, 0, 200, 600)),
        ]);
        assert!(manager.is_under(0, Point::new(10, 10)));
        assert!(!manager.is_under(0, Point::new(300, 10)));
        assert!(manager.is_under(1, Point::new(300, 10)));
        assert!(!manager.is_under(2, Point::new(300, 10)));
        assert_eq!(manager.surface_at(Point::new(300, 10)), Some("a"));
        assert_eq!(manager.surface_at(Point::new(10, 10)), Some("side"));
    }
}
