//! Tweenline - scrubbable property-animation chains
//!
//! A chain of timed segments, each interpolating named numeric properties on
//! a target object between a start and an end value over a duration, with
//! start/complete callbacks. Consumers scrub a single shared clock forward or
//! backward; the chain re-evaluates all segments consistently regardless of
//! direction, enabling both playback and arbitrary seeking (e.g. a timeline
//! UI).
//!
//! # Features
//!
//! - **Fluent chains**: `to` / `from` / `wait` / `add` compose segments
//!   end to end on one clock
//! - **Value inheritance**: chained segments continue from the end value of
//!   the prior animation of the same property on the same target
//! - **Bidirectional scrubbing**: seeking backward retracts segments, firing
//!   completion and start notifications in reverse order
//! - **Target capability**: hosts expose properties through the
//!   [`TweenTarget`] trait; map-based property bags work out of the box
//! - **Easing presets**: quadratic/cubic families plus custom curves
//!
//! The library never interrupts a caller's animation loop: missing
//! properties, zero durations, and repeated queries all degrade silently
//! instead of failing.

pub mod chain;
pub mod easing;
pub mod segment;
pub mod target;

pub use chain::Tween;
pub use easing::Easing;
pub use segment::{FirstTouch, PropertyMap, Segment, SegmentState};
pub use target::{shared_target, NullTarget, TargetHandle, TweenTarget};
