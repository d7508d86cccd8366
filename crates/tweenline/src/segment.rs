//! Chain segments
//!
//! A segment is one timed unit of a chain: a position on the shared clock, a
//! duration, a from/to property range, an easing curve, and lifecycle state.
//! The evaluator maps an absolute time to a lifecycle state, fires
//! start/complete notifications exactly once per transition, and drives the
//! interpolation step that writes blended values into the target.

use crate::easing::Easing;
use crate::target::TargetHandle;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::fmt;

/// Insertion-ordered map from property name to numeric value
pub type PropertyMap = IndexMap<String, f32, FxBuildHasher>;

/// First evaluation at or below this time counts as a rewind first touch:
/// the segment is being encountered while scrubbing backward past its end,
/// so completion fires before rewinding into its started state.
pub(crate) const REWIND_ONSET: f32 = -1.0;

/// Lifecycle state of a segment relative to the current chain time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SegmentState {
    /// Never evaluated
    #[default]
    Undefined,
    /// Current time is before the segment's position
    Before,
    /// Current time is inside the segment's span
    Running,
    /// Current time is at or past the segment's end
    After,
}

impl SegmentState {
    /// Classify an absolute time against a segment span
    ///
    /// Pure function of `(position, duration, time)`. The end instant belongs
    /// to `After`, not `Running`.
    pub fn classify(position: f32, duration: f32, time: f32) -> SegmentState {
        let end = position + duration;
        if time < position {
            SegmentState::Before
        } else if time >= end {
            SegmentState::After
        } else {
            SegmentState::Running
        }
    }
}

/// How a segment was first pulled into evaluation
///
/// The first-ever evaluation of a segment selects between two notification
/// rules depending on the direction time was moving; the choice is recorded
/// here rather than inferred from a sentinel time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FirstTouch {
    /// Not yet evaluated
    #[default]
    Pending,
    /// First evaluated with time moving forward
    Forward,
    /// First evaluated on a rewind pass, before ever running forward
    Backward,
}

/// One timed unit of a chain
///
/// Created by the chain builder, never re-parented, destroyed only by the
/// chain-wide dispose. Segments live in the chain's owned sequence; the
/// predecessor of segment `i` is segment `i - 1`.
pub struct Segment {
    pub(crate) target: TargetHandle,
    pub(crate) position: f32,
    pub(crate) duration: f32,
    pub(crate) ease: Option<Easing>,
    pub(crate) properties_from: PropertyMap,
    pub(crate) properties_to: PropertyMap,
    pub(crate) state: SegmentState,
    pub(crate) last_eval: Option<f32>,
    pub(crate) first_touch: FirstTouch,
    pub(crate) on_start: Option<Box<dyn FnMut()>>,
    pub(crate) on_complete: Option<Box<dyn FnMut()>>,
    pub(crate) debug: bool,
    pub(crate) label: &'static str,
}

impl Segment {
    pub(crate) fn new(
        target: TargetHandle,
        position: f32,
        duration: f32,
        ease: Option<Easing>,
        properties_from: PropertyMap,
        properties_to: PropertyMap,
        debug: bool,
        label: &'static str,
    ) -> Self {
        Self {
            target,
            position,
            duration,
            ease,
            properties_from,
            properties_to,
            state: SegmentState::Undefined,
            last_eval: None,
            first_touch: FirstTouch::Pending,
            on_start: None,
            on_complete: None,
            debug,
            label,
        }
    }

    /// Offset (time units) from chain origin at which this segment begins
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Length of the segment in time units; 0 means instantaneous
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Easing curve; `None` disables interpolation (hold segments)
    pub fn ease(&self) -> Option<Easing> {
        self.ease
    }

    /// Property values at the segment's start
    pub fn properties_from(&self) -> &PropertyMap {
        &self.properties_from
    }

    /// Property values at the segment's end
    pub fn properties_to(&self) -> &PropertyMap {
        &self.properties_to
    }

    /// Lifecycle state as of the last evaluation
    pub fn state(&self) -> SegmentState {
        self.state
    }

    /// Direction of the segment's first-ever evaluation
    pub fn first_touch(&self) -> FirstTouch {
        self.first_touch
    }

    /// Builder operation that created this segment
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Evaluate the segment at an absolute chain time
    ///
    /// Skipped entirely when `time` equals the last evaluation time, so
    /// repeated queries at the same instant are silent no-ops.
    pub(crate) fn evaluate(&mut self, time: f32) {
        if self.last_eval == Some(time) {
            return;
        }

        let state = SegmentState::classify(self.position, self.duration, time);

        match self.state {
            SegmentState::Undefined => {
                if time > REWIND_ONSET {
                    self.first_touch = FirstTouch::Forward;
                    match state {
                        SegmentState::Running => {
                            self.notify_start();
                            self.process(time - self.position);
                        }
                        SegmentState::After => {
                            self.notify_start();
                            self.process(self.duration);
                            self.notify_complete();
                        }
                        // The segment has not begun: no notification, no
                        // interpolation.
                        SegmentState::Before | SegmentState::Undefined => {}
                    }
                } else {
                    self.first_touch = FirstTouch::Backward;
                    match state {
                        SegmentState::Running => {
                            self.notify_complete();
                            self.process(time - self.position);
                        }
                        SegmentState::Before => {
                            self.notify_complete();
                            self.process(0.0);
                            self.notify_start();
                        }
                        SegmentState::After | SegmentState::Undefined => {}
                    }
                }
            }
            prev => match state {
                SegmentState::Before => {
                    if prev != SegmentState::Before {
                        self.process(0.0);
                        self.notify_start();
                    }
                }
                SegmentState::Running => {
                    if prev == SegmentState::Before {
                        self.notify_start();
                    } else if prev == SegmentState::After {
                        self.notify_complete();
                    }
                    self.process(time - self.position);
                }
                SegmentState::After => {
                    if prev != SegmentState::After {
                        self.process(self.duration);
                        self.notify_complete();
                    }
                }
                // classify never yields Undefined
                SegmentState::Undefined => {}
            },
        }

        self.last_eval = Some(time);
        self.state = state;
    }

    /// Write interpolated values for `elapsed` time units into the span
    ///
    /// No-op when the segment has no easing curve or a zero duration, so
    /// hold and switch segments never touch the target and a ratio is never
    /// computed against a zero divisor.
    fn process(&self, elapsed: f32) {
        let Some(ease) = self.ease else {
            return;
        };
        if self.duration == 0.0 {
            return;
        }

        let ratio = ease.apply(elapsed / self.duration);
        let mut target = self.target.borrow_mut();

        for (name, &to) in &self.properties_to {
            let from = self.properties_from.get(name).copied().unwrap_or(to);
            // Boundary ratios assign the endpoint values exactly, avoiding
            // floating rounding at segment edges.
            let value = if ratio == 0.0 {
                from
            } else if ratio == 1.0 {
                to
            } else {
                from + (to - from) * ratio
            };
            target.set(name, value);
        }
    }

    fn notify_start(&mut self) {
        if self.debug {
            tracing::debug!(segment = self.label, position = self.position, "start");
        }
        if let Some(callback) = self.on_start.as_mut() {
            callback();
        }
    }

    fn notify_complete(&mut self) {
        if self.debug {
            tracing::debug!(segment = self.label, position = self.position, "complete");
        }
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
    }
}

// Callbacks are opaque; everything else is printable.
impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("label", &self.label)
            .field("position", &self.position)
            .field("duration", &self.duration)
            .field("state", &self.state)
            .field("first_touch", &self.first_touch)
            .field("properties_from", &self.properties_from)
            .field("properties_to", &self.properties_to)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::shared_target;
    use std::collections::HashMap;

    fn bag(entries: &[(&str, f32)]) -> crate::target::TargetHandle {
        let map: HashMap<String, f32> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        shared_target(map)
    }

    fn props(entries: &[(&str, f32)]) -> PropertyMap {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_state_classification() {
        assert_eq!(SegmentState::classify(1.0, 2.0, 0.5), SegmentState::Before);
        assert_eq!(SegmentState::classify(1.0, 2.0, 1.0), SegmentState::Running);
        assert_eq!(SegmentState::classify(1.0, 2.0, 2.9), SegmentState::Running);
        assert_eq!(SegmentState::classify(1.0, 2.0, 3.0), SegmentState::After);
        assert_eq!(SegmentState::classify(1.0, 2.0, 5.0), SegmentState::After);
    }

    #[test]
    fn test_end_instant_belongs_to_after() {
        assert_eq!(SegmentState::classify(0.0, 1.0, 1.0), SegmentState::After);
        // Zero duration: the start instant is already the end instant.
        assert_eq!(SegmentState::classify(2.0, 0.0, 2.0), SegmentState::After);
    }

    #[test]
    fn test_interpolation_boundaries_are_exact() {
        let target = bag(&[("x", 0.0)]);
        let mut seg = Segment::new(
            target.clone(),
            0.0,
            3.0,
            Some(Easing::Linear),
            props(&[("x", 0.1)]),
            props(&[("x", 0.3)]),
            false,
            "to",
        );

        seg.evaluate(0.0);
        assert_eq!(target.borrow().get("x"), Some(0.1));

        seg.evaluate(3.0);
        assert_eq!(target.borrow().get("x"), Some(0.3));
    }

    #[test]
    fn test_interpolation_midpoint() {
        let target = bag(&[("x", 0.0)]);
        let mut seg = Segment::new(
            target.clone(),
            0.0,
            2.0,
            Some(Easing::Linear),
            props(&[("x", 10.0)]),
            props(&[("x", 20.0)]),
            false,
            "to",
        );

        seg.evaluate(1.0);
        let x = target.borrow().get("x").unwrap();
        assert!((x - 15.0).abs() < 1e-5);
    }

    #[test]
    fn test_absent_ease_never_touches_target() {
        let target = bag(&[("x", 7.0)]);
        let mut seg = Segment::new(
            target.clone(),
            0.0,
            1.0,
            None,
            props(&[("x", 0.0)]),
            props(&[("x", 99.0)]),
            false,
            "wait",
        );

        seg.evaluate(0.5);
        seg.evaluate(2.0);
        assert_eq!(target.borrow().get("x"), Some(7.0));
    }

    #[test]
    fn test_zero_duration_never_touches_target() {
        let target = bag(&[("x", 7.0)]);
        let mut seg = Segment::new(
            target.clone(),
            0.0,
            0.0,
            Some(Easing::Linear),
            props(&[("x", 0.0)]),
            props(&[("x", 99.0)]),
            false,
            "to",
        );

        seg.evaluate(1.0);
        assert_eq!(target.borrow().get("x"), Some(7.0));
        assert_eq!(seg.state(), SegmentState::After);
    }

    #[test]
    fn test_repeated_evaluation_is_skipped() {
        let target = bag(&[("x", 0.0)]);
        let mut seg = Segment::new(
            target.clone(),
            0.0,
            1.0,
            Some(Easing::Linear),
            props(&[("x", 0.0)]),
            props(&[("x", 10.0)]),
            false,
            "to",
        );
        let starts = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = starts.clone();
        seg.on_start = Some(Box::new(move || counter.set(counter.get() + 1)));

        seg.evaluate(0.5);
        // Clobber the target; a repeat at the same time must not rewrite it.
        target.borrow_mut().set("x", -1.0);
        seg.evaluate(0.5);

        assert_eq!(starts.get(), 1);
        assert_eq!(target.borrow().get("x"), Some(-1.0));
    }

    #[test]
    fn test_forward_first_touch_past_end_fires_both() {
        let target = bag(&[("x", 0.0)]);
        let mut seg = Segment::new(
            target.clone(),
            0.0,
            1.0,
            Some(Easing::Linear),
            props(&[("x", 0.0)]),
            props(&[("x", 10.0)]),
            false,
            "to",
        );
        let events = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let (s, c) = (events.clone(), events.clone());
        seg.on_start = Some(Box::new(move || s.borrow_mut().push("start")));
        seg.on_complete = Some(Box::new(move || c.borrow_mut().push("complete")));

        seg.evaluate(5.0);

        assert_eq!(*events.borrow(), vec!["start", "complete"]);
        assert_eq!(target.borrow().get("x"), Some(10.0));
        assert_eq!(seg.first_touch(), FirstTouch::Forward);
    }

    #[test]
    fn test_backward_first_touch_fires_complete_then_start() {
        let target = bag(&[("x", 10.0)]);
        let mut seg = Segment::new(
            target.clone(),
            0.0,
            1.0,
            Some(Easing::Linear),
            props(&[("x", 0.0)]),
            props(&[("x", 10.0)]),
            false,
            "to",
        );
        let events = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let (s, c) = (events.clone(), events.clone());
        seg.on_start = Some(Box::new(move || s.borrow_mut().push("start")));
        seg.on_complete = Some(Box::new(move || c.borrow_mut().push("complete")));

        // First-ever evaluation on a rewind pass, below the rewind onset.
        seg.evaluate(-2.0);

        assert_eq!(*events.borrow(), vec!["complete", "start"]);
        assert_eq!(target.borrow().get("x"), Some(0.0));
        assert_eq!(seg.first_touch(), FirstTouch::Backward);
        assert_eq!(seg.state(), SegmentState::Before);
    }

    #[test]
    fn test_forward_first_touch_before_is_silent() {
        let target = bag(&[("x", 5.0)]);
        let mut seg = Segment::new(
            target.clone(),
            2.0,
            1.0,
            Some(Easing::Linear),
            props(&[("x", 0.0)]),
            props(&[("x", 10.0)]),
            false,
            "to",
        );
        let starts = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = starts.clone();
        seg.on_start = Some(Box::new(move || counter.set(counter.get() + 1)));

        seg.evaluate(0.5);

        assert_eq!(starts.get(), 0);
        assert_eq!(target.borrow().get("x"), Some(5.0));
        assert_eq!(seg.state(), SegmentState::Before);
        assert_eq!(seg.first_touch(), FirstTouch::Forward);
    }
}
