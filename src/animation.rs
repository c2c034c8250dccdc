//! Interval-driven style tweens.
//!
//! `animate_style` steps every animation at 30 frames per second with a cubic
//! ease-in-out curve. `cancel` stops where it is without the completion
//! callback; `force_complete` jumps to the end values and runs it.

use std::collections::HashMap;
use std::time::Duration;

use crate::dom::{Dom, ElementId};
use crate::event_loop::{EventLoopOwner, Task, TimerId};

/// One frame at 30 fps.
pub const FRAME_INTERVAL: Duration = Duration::from_micros(33_333);

/// Tween of one numeric style property.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleAnimation {
    pub element: ElementId,
    pub property: String,
    pub start: f64,
    pub end: f64,
}

impl StyleAnimation {
    pub fn new(element: ElementId, property: &str, start: f64, end: f64) -> Self {
        Self {
            element,
            property: property.to_string(),
            start,
            end,
        }
    }

    fn apply(&self, dom: &mut dyn Dom, progress: f64) {
        let value = self.start + (self.end - self.start) * cubic_in_out(progress);
        let text = if self.property == "opacity" {
            format!("{}", value)
        } else {
            format!("{}px", value)
        };
        dom.set_style_property(self.element, &self.property, &text);
    }
}

/// Handle to a running animation group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(u64);

struct Running<C> {
    timer: TimerId,
    animations: Vec<StyleAnimation>,
    duration: Duration,
    elapsed: Duration,
    on_complete: Option<Task<C>>,
}

/// Animation groups currently in flight.
pub struct Animator<C> {
    running: HashMap<AnimationHandle, Running<C>>,
    next_id: u64,
}

impl<C> Default for Animator<C> {
    fn default() -> Self {
        Self {
            running: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<C> Animator<C> {
    pub fn is_running(&self, handle: AnimationHandle) -> bool {
        self.running.contains_key(&handle)
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }
}

/// Owners that can run style animations.
pub trait AnimationHost: EventLoopOwner {
    fn animator(&mut self) -> &mut Animator<Self>;
    fn animation_dom(&mut self) -> &mut dyn Dom;
}

/// Start tweening `animations` over `duration`.
pub fn animate_style<H: AnimationHost>(
    host: &mut H,
    animations: Vec<StyleAnimation>,
    duration: Duration,
    on_complete: Option<Task<H>>,
) -> AnimationHandle {
    let animator = host.animator();
    animator.next_id += 1;
    let handle = AnimationHandle(animator.next_id);

    let timer = host
        .event_loop()
        .set_interval(FRAME_INTERVAL, Box::new(move |host: &mut H| frame(host, handle)));
    host.animator().running.insert(
        handle,
        Running {
            timer,
            animations,
            duration,
            elapsed: Duration::ZERO,
            on_complete,
        },
    );
    handle
}

/// Stop without applying end values or running the completion callback.
pub fn cancel<H: AnimationHost>(host: &mut H, handle: AnimationHandle) -> bool {
    let Some(running) = host.animator().running.remove(&handle) else {
        return false;
    };
    host.event_loop().clear_timer(running.timer);
    true
}

/// Jump to the end values and run the completion callback.
pub fn force_complete<H: AnimationHost>(host: &mut H, handle: AnimationHandle) -> bool {
    let Some(running) = host.animator().running.remove(&handle) else {
        return false;
    };
    finish(host, running);
    true
}

fn frame<H: AnimationHost>(host: &mut H, handle: AnimationHandle) {
    let Some(running) = host.animator().running.get_mut(&handle) else {
        return;
    };
    running.elapsed += FRAME_INTERVAL;
    if running.elapsed >= running.duration {
        if let Some(running) = host.animator().running.remove(&handle) {
            finish(host, running);
        }
        return;
    }

    let progress = running.elapsed.as_secs_f64() / running.duration.as_secs_f64();
    let animations = running.animations.clone();
    let dom = host.animation_dom();
    for animation in &animations {
        animation.apply(dom, progress);
    }
}

fn finish<H: AnimationHost>(host: &mut H, running: Running<H>) {
    host.event_loop().clear_timer(running.timer);
    let dom = host.animation_dom();
    for animation in &running.animations {
        animation.apply(dom, 1.0);
    }
    if let Some(on_complete) = running.on_complete {
        on_complete(host);
    }
}

/// Cubic ease-in-out over `t` in `[0, 1]`.
pub fn cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
