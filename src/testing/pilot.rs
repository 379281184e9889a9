//! Pilot: programmatic interaction with a headless Gui.
//!
//! The `Pilot` owns a [`World`] with a Gui that has taken over a built root
//! and is attached to the document body. It simulates native input against
//! components looked up by uid, keeps a virtual clock for the tap monitor,
//! and drains the deferred task queue on demand.

use std::rc::Rc;
use std::time::Duration;

use crate::component::ComponentId;
use crate::error::Result;
use crate::event::input::{Key, KeyEvent, Modifiers};
use crate::event::names::{CLICK, KEYDOWN, PASTE, TOUCHEND, TOUCHMOVE, TOUCHSTART};
use crate::event::{DispatchOutcome, DispatchTrace, NativeEvent};
use crate::spec::AlloySpec;
use crate::system::attachment::attach_system;
use crate::system::{Gui, GuiConfig};
use crate::world::World;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless Gui driver for testing.
///
/// # Examples
///
/// ```ignore
/// use alloy_ui::testing::Pilot;
///
/// let mut pilot = Pilot::new(spec)?;
/// pilot.execute("save")?;
/// pilot.process();
/// ```
pub struct Pilot {
    world: World,
    gui: Gui,
    clock: Duration,
}

impl Pilot {
    /// Build `root`, take it over with a default config and put it in the
    /// document.
    pub fn new(root: impl Into<AlloySpec>) -> Result<Self> {
        Self::with_config(root, GuiConfig::new())
    }

    pub fn with_config(root: impl Into<AlloySpec>, config: GuiConfig) -> Result<Self> {
        let mut world = World::new();
        let root = world.build(root)?;
        let gui = Gui::takeover(&mut world, root, config)?;
        let body = world.dom().body();
        attach_system(&mut world, body, gui)?;
        Ok(Self {
            world,
            gui,
            clock: Duration::ZERO,
        })
    }

    // ── Access ───────────────────────────────────────────────────────

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn gui(&self) -> Gui {
        self.gui
    }

    pub fn root(&self) -> ComponentId {
        self.gui.root()
    }

    pub fn component(&self, uid: &str) -> Result<ComponentId> {
        self.gui.get_by_uid(&self.world, uid)
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.clock
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Dispatch a bare native event of `kind` at the component `uid`.
    pub fn fire(&mut self, kind: &str, uid: &str) -> Result<Rc<NativeEvent>> {
        let target = self.world.element(self.component(uid)?)?;
        let event = NativeEvent::new(kind, target).at_time(self.clock);
        Ok(self.send(event))
    }

    /// Dispatch a prepared native event and hand it back for inspection.
    pub fn send(&mut self, event: NativeEvent) -> Rc<NativeEvent> {
        let event = Rc::new(event);
        self.gui.dispatch_native(&mut self.world, Rc::clone(&event));
        event
    }

    /// Send `alloy.execute` to `uid` directly.
    pub fn execute(&mut self, uid: &str) -> Result<()> {
        let component = self.component(uid)?;
        self.world.emit_execute(component);
        Ok(())
    }

    pub fn click(&mut self, uid: &str) -> Result<Rc<NativeEvent>> {
        self.fire(CLICK, uid)
    }

    pub fn press_key(&mut self, uid: &str, key: Key) -> Result<Rc<NativeEvent>> {
        let target = self.world.element(self.component(uid)?)?;
        let event = NativeEvent::new(KEYDOWN, target)
            .with_key(KeyEvent::new(key, Modifiers::NONE))
            .at_time(self.clock);
        Ok(self.send(event))
    }

    pub fn paste(&mut self, uid: &str, text: &str) -> Result<Rc<NativeEvent>> {
        let target = self.world.element(self.component(uid)?)?;
        let event = NativeEvent::new(PASTE, target)
            .with_data(text)
            .at_time(self.clock);
        Ok(self.send(event))
    }

    pub fn touch_start(&mut self, uid: &str, x: f64, y: f64) -> Result<Rc<NativeEvent>> {
        self.touch(TOUCHSTART, uid, x, y)
    }

    pub fn touch_move(&mut self, uid: &str, x: f64, y: f64) -> Result<Rc<NativeEvent>> {
        self.touch(TOUCHMOVE, uid, x, y)
    }

    pub fn touch_end(&mut self, uid: &str, x: f64, y: f64) -> Result<Rc<NativeEvent>> {
        self.touch(TOUCHEND, uid, x, y)
    }

    fn touch(&mut self, kind: &str, uid: &str, x: f64, y: f64) -> Result<Rc<NativeEvent>> {
        let target = self.world.element(self.component(uid)?)?;
        let event = NativeEvent::new(kind, target)
            .at(x, y)
            .with_touches(1)
            .at_time(self.clock);
        Ok(self.send(event))
    }

    /// A touch start followed by a touch end at the same spot.
    pub fn tap(&mut self, uid: &str) -> Result<Rc<NativeEvent>> {
        self.touch_start(uid, 0.0, 0.0)?;
        self.touch_end(uid, 0.0, 0.0)
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Move the virtual clock and fire any timers that came due.
    pub fn advance(&mut self, by: Duration) -> bool {
        self.clock += by;
        self.gui.run_timers(&mut self.world, self.clock)
    }

    /// Run deferred tasks until the queue is empty.
    pub fn process(&mut self) -> usize {
        let mut total = 0;
        while self.world.has_pending() {
            total += self.world.run_pending();
        }
        total
    }

    // ── Query ────────────────────────────────────────────────────────

    /// The root's html without generated uids.
    pub fn html(&self) -> String {
        self.world.outer_html_without_uids(self.root())
    }

    pub fn traces(&mut self) -> Vec<DispatchTrace> {
        self.gui.take_traces(&mut self.world)
    }

    /// Outcome of dispatching `event` to `uid` without any native wiring.
    pub fn emit(&mut self, uid: &str, event: &str) -> Result<Option<DispatchOutcome>> {
        let component = self.component(uid)?;
        let target = self.world.element(component)?;
        Ok(self
            .world
            .dispatch_with(component, target, event, crate::event::EventPayload::None))
    }
}
