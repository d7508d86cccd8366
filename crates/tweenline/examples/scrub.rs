//! Scrub a chain across a custom target, forward then backward.
//!
//! Run with debug traces:
//! `RUST_LOG=debug cargo run -p tweenline --example scrub`

use std::cell::RefCell;
use std::rc::Rc;
use tweenline::{Easing, TargetHandle, Tween, TweenTarget};

struct Sprite {
    x: f32,
    y: f32,
    alpha: f32,
}

impl TweenTarget for Sprite {
    fn get(&self, name: &str) -> Option<f32> {
        match name {
            "x" => Some(self.x),
            "y" => Some(self.y),
            "alpha" => Some(self.alpha),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, value: f32) {
        match name {
            "x" => self.x = value,
            "y" => self.y = value,
            "alpha" => self.alpha = value,
            _ => {}
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let sprite: TargetHandle = Rc::new(RefCell::new(Sprite {
        x: 0.0,
        y: 0.0,
        alpha: 1.0,
    }));

    let mut chain = Tween::new(sprite.clone())
        .with_debug(true)
        .with_name("intro")
        .to_with_easing([("x", 100.0), ("y", 40.0)], 1.0, Easing::EaseOutCubic)
        .wait(0.5)
        .to([("alpha", 0.0)], 0.5)
        .then(|| println!("chain complete"));

    println!("duration: {}", chain.duration());

    println!("-- forward --");
    let mut t = 0.0;
    while t <= chain.duration() {
        chain.set_time(t);
        let s = sprite.borrow();
        println!(
            "t={:.2}  x={:7.2}  y={:6.2}  alpha={:.2}  finished={}",
            t,
            s.get("x").unwrap_or(0.0),
            s.get("y").unwrap_or(0.0),
            s.get("alpha").unwrap_or(0.0),
            chain.finished()
        );
        t += 0.25;
    }

    println!("-- backward --");
    while t >= 0.0 {
        chain.set_time(t);
        let s = sprite.borrow();
        println!(
            "t={:.2}  x={:7.2}  y={:6.2}  alpha={:.2}",
            t,
            s.get("x").unwrap_or(0.0),
            s.get("y").unwrap_or(0.0),
            s.get("alpha").unwrap_or(0.0),
        );
        t -= 0.25;
    }

    chain.dispose();
}
