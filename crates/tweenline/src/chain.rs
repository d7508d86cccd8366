//! Chain controller
//!
//! `Tween` owns the ordered segment sequence and the single shared clock.
//! Chain-building operations append segments and resolve their implicit
//! start/end values from chain history; playback operations scrub the clock
//! in either direction and sweep the sequence, forward root-to-tail and
//! backward tail-to-root so completions push into downstream starts and
//! retractions unwind in reverse.

use crate::easing::Easing;
use crate::segment::{PropertyMap, Segment, SegmentState};
use crate::target::{shared_target, NullTarget, TargetHandle};
use std::rc::Rc;

/// A scrubbable chain of property-animation segments sharing one clock
///
/// Built fluently; every operation consumes and returns the chain:
///
/// ```
/// use tweenline::{shared_target, Tween};
/// use std::collections::HashMap;
///
/// let sprite = shared_target(HashMap::from([("x".to_string(), 0.0f32)]));
/// let mut chain = Tween::new(sprite.clone())
///     .to([("x", 10.0)], 1.0)
///     .wait(1.0)
///     .to([("x", 20.0)], 1.0);
///
/// chain.set_time(0.5);
/// assert!((sprite.borrow().get("x").unwrap() - 5.0).abs() < 1e-5);
/// chain.set_time(3.0);
/// assert!(chain.finished());
/// ```
///
/// Calling chain operations after [`Tween::dispose`] is undefined; the
/// implementation degrades to silent no-ops.
pub struct Tween {
    segments: Vec<Segment>,
    time: f32,
    current: TargetHandle,
    debug: bool,
    name: String,
    disposed: bool,
}

impl Tween {
    /// Create a chain animating `target`
    ///
    /// The chain starts with a root segment at position 0 with duration 0;
    /// timed operations append after it.
    pub fn new(target: TargetHandle) -> Self {
        let mut chain = Self {
            segments: Vec::new(),
            time: 0.0,
            current: target.clone(),
            debug: false,
            name: String::new(),
            disposed: false,
        };
        chain.push_segment(
            target,
            0.0,
            Some(Easing::Linear),
            PropertyMap::default(),
            PropertyMap::default(),
            "root",
        );
        chain
    }

    /// Enable or disable debug trace lines
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        for segment in &mut self.segments {
            segment.debug = debug;
        }
        self
    }

    /// Name the chain for debug trace lines
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    // ========================================================================
    // Chain building
    // ========================================================================

    /// Switch the target that subsequent timed operations act on
    ///
    /// Appends an instantaneous segment so the switch occupies a place in
    /// the chain's history.
    pub fn add(mut self, target: TargetHandle) -> Self {
        if self.disposed {
            return self;
        }
        self.current = target.clone();
        self.push_segment(
            target,
            0.0,
            Some(Easing::Linear),
            PropertyMap::default(),
            PropertyMap::default(),
            "add",
        );
        self
    }

    /// Animate the current target from the given values with linear easing
    pub fn from<K, I>(self, properties: I, duration: f32) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f32)>,
    {
        self.from_with_easing(properties, duration, Easing::Linear)
    }

    /// Animate the current target from the given values
    ///
    /// End values are resolved by value lookup: the most recent segment that
    /// targets the same object and animates the same property supplies its
    /// end value, otherwise the target's live value is captured once, at
    /// construction time.
    pub fn from_with_easing<K, I>(mut self, properties: I, duration: f32, easing: Easing) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f32)>,
    {
        if self.disposed {
            return self;
        }
        let from: PropertyMap = properties.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let to: PropertyMap = from
            .keys()
            .map(|name| (name.clone(), self.lookup_value(name)))
            .collect();
        let target = self.current.clone();
        self.push_segment(target, duration, Some(easing), from, to, "from");
        self
    }

    /// Animate the current target to the given values with linear easing
    pub fn to<K, I>(self, properties: I, duration: f32) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f32)>,
    {
        self.to_with_easing(properties, duration, Easing::Linear)
    }

    /// Animate the current target to the given values
    ///
    /// Start values are resolved by value lookup (see
    /// [`Tween::from_with_easing`]), so chained `to` calls continue from the
    /// end value of the prior animation of the same property without the
    /// caller repeating it.
    pub fn to_with_easing<K, I>(mut self, properties: I, duration: f32, easing: Easing) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f32)>,
    {
        if self.disposed {
            return self;
        }
        let to: PropertyMap = properties.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let from: PropertyMap = to
            .keys()
            .map(|name| (name.clone(), self.lookup_value(name)))
            .collect();
        let target = self.current.clone();
        self.push_segment(target, duration, Some(easing), from, to, "to");
        self
    }

    /// Hold the current values for `duration` time units
    ///
    /// The segment carries the predecessor's property range but no easing
    /// curve, so interpolation never runs; the duration purely advances the
    /// clock.
    pub fn wait(mut self, duration: f32) -> Self {
        if self.disposed {
            return self;
        }
        let (from, to) = match self.segments.last() {
            Some(prev) => (prev.properties_from.clone(), prev.properties_to.clone()),
            None => (PropertyMap::default(), PropertyMap::default()),
        };
        let target = self.current.clone();
        self.push_segment(target, duration, None, from, to, "wait");
        self
    }

    /// Invoke `callback` when the chain's tail segment completes
    ///
    /// Overwrites any callback previously attached to the tail.
    pub fn then(mut self, callback: impl FnMut() + 'static) -> Self {
        if let Some(tail) = self.segments.last_mut() {
            tail.on_complete = Some(Box::new(callback));
        }
        self
    }

    /// Invoke `callback` when the chain's tail segment starts
    ///
    /// Overwrites any callback previously attached to the tail.
    pub fn on_start(mut self, callback: impl FnMut() + 'static) -> Self {
        if let Some(tail) = self.segments.last_mut() {
            tail.on_start = Some(Box::new(callback));
        }
        self
    }

    fn push_segment(
        &mut self,
        target: TargetHandle,
        duration: f32,
        ease: Option<Easing>,
        from: PropertyMap,
        to: PropertyMap,
        label: &'static str,
    ) {
        let duration = if duration.is_nan() || duration < 0.0 {
            0.0
        } else {
            duration
        };
        let position = self
            .segments
            .last()
            .map(|tail| tail.position + tail.duration)
            .unwrap_or(0.0);
        if self.debug {
            tracing::debug!(
                chain = %self.name,
                segment = label,
                position,
                duration,
                "segment added"
            );
        }
        self.segments.push(Segment::new(
            target, position, duration, ease, from, to, self.debug, label,
        ));
    }

    /// Resolve a property's implicit value against the current target
    ///
    /// Walks the sequence backward for the most recent segment targeting the
    /// same object with an end value for `name`; falls back to the target's
    /// live value, and to 0 for a property the target does not carry.
    fn lookup_value(&self, name: &str) -> f32 {
        for segment in self.segments.iter().rev() {
            if Rc::ptr_eq(&segment.target, &self.current) {
                if let Some(&value) = segment.properties_to.get(name) {
                    return value;
                }
            }
        }
        self.current.borrow().get(name).unwrap_or(0.0)
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Seek to an absolute chain time
    pub fn set_time(&mut self, value: f32) {
        let delta = value - self.time;
        self.update(delta);
    }

    /// Current chain time
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance (or rewind, for negative `delta`) the clock and re-evaluate
    /// every segment at the new time
    ///
    /// Forward sweeps walk root to tail so a segment pushes its completion
    /// into the next segment's start within the same call; rewinds walk tail
    /// to root so downstream segments retract ahead of upstream ones
    /// re-opening.
    pub fn update(&mut self, delta: f32) {
        if self.disposed {
            return;
        }
        self.time += delta;
        let time = self.time;
        if delta < 0.0 {
            for segment in self.segments.iter_mut().rev() {
                segment.evaluate(time);
            }
        } else {
            for segment in self.segments.iter_mut() {
                segment.evaluate(time);
            }
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// True once every segment has passed its end
    pub fn finished(&self) -> bool {
        !self.segments.is_empty()
            && self
                .segments
                .iter()
                .all(|segment| segment.state == SegmentState::After)
    }

    /// Total chain length in time units
    pub fn duration(&self) -> f32 {
        self.segments
            .last()
            .map(|tail| tail.position + tail.duration)
            .unwrap_or(0.0)
    }

    /// Clamped progress through the chain; 1.0 for a zero-length chain
    pub fn progress(&self) -> f32 {
        let duration = self.duration();
        if duration == 0.0 {
            return 1.0;
        }
        (self.time / duration).clamp(0.0, 1.0)
    }

    /// The chain's segments in construction order; index 0 is the root
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Name given via [`Tween::with_name`]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once [`Tween::dispose`] has run
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Tear down the chain, releasing all segments and target references
    ///
    /// Segments drop tail-first so no segment outlives its chain. Idempotent;
    /// any other operation after dispose is undefined and degrades to a
    /// silent no-op.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        while let Some(segment) = self.segments.pop() {
            if self.debug {
                tracing::debug!(chain = %self.name, segment = segment.label, "segment disposed");
            }
        }
        if self.debug {
            tracing::debug!(chain = %self.name, "disposed");
        }
        self.current = shared_target(NullTarget);
        self.disposed = true;
    }
}
