use std::collections::HashMap;

use tracing::trace;

use crate::{error::LispleError, interpreter::Value};


/// Handle to a scope frame living in an [AllocationContext].
///
/// The generation tells apart a live frame from a released one whose slot
/// has since been reused, so a stale handle can never alias a newer frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Frame {
    bindings: HashMap<String, Value>,
    parent: Option<FrameId>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    frame: Option<Frame>,
}

/// Arena owning every scope frame of an evaluation context.
///
/// Frames form a tree through their parent links. Closures refer to the frame
/// they were defined in by [FrameId], so a frame stays alive for as long as a
/// closure reachable from the roots of [AllocationContext::collect] points at
/// it, and is released by the next collection after that.
#[derive(Debug, Default)]
pub struct AllocationContext {
    slots: Vec<Slot>,
    free: Vec<usize>,
}

impl AllocationContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, frame: Frame) -> FrameId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.frame = Some(frame);
            return FrameId { index, generation: slot.generation };
        }

        self.slots.push(Slot { generation: 0, frame: Some(frame) });
        FrameId { index: self.slots.len() - 1, generation: 0 }
    }

    fn frame(&self, id: FrameId) -> Option<&Frame> {
        self.slots.get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.frame.as_ref())
    }

    fn frame_mut(&mut self, id: FrameId) -> Option<&mut Frame> {
        self.slots.get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.frame.as_mut())
    }

    /// Allocates a frame without a parent.
    pub fn root(&mut self) -> FrameId {
        self.allocate(Frame { bindings: HashMap::new(), parent: None })
    }

    /// Binds `name` in `frame` itself, replacing any earlier binding there.
    /// Parent frames are never touched.
    pub fn define(&mut self, frame: FrameId, name: impl Into<String>, value: Value) -> Result<(), LispleError> {
        let frame = self.frame_mut(frame).ok_or(LispleError::ReleasedFrame)?;
        frame.bindings.insert(name.into(), value);
        Ok(())
    }

    /// Finds the innermost binding of `name`, starting at `frame` and walking
    /// out through the parents. `None` is an ordinary answer, not a failure.
    pub fn lookup(&self, frame: FrameId, name: &str) -> Option<Value> {
        let mut current = Some(frame);
        while let Some(id) = current {
            let frame = self.frame(id)?;
            if let Some(value) = frame.bindings.get(name) {
                return Some(value.clone());
            }
            current = frame.parent;
        }
        None
    }

    /// Creates a child of `parent` binding each parameter to the argument in
    /// the same position.
    pub fn extend(&mut self, parent: FrameId, parameters: &[String], arguments: Vec<Value>) -> Result<FrameId, LispleError> {
        if self.frame(parent).is_none() { return Err(LispleError::ReleasedFrame); }
        if parameters.len() != arguments.len() {
            return Err(LispleError::Arity(format!(
                "expected {} arguments but got {}", parameters.len(), arguments.len()
            )));
        }

        let bindings = parameters.iter().cloned().zip(arguments).collect();
        Ok(self.allocate(Frame { bindings, parent: Some(parent) }))
    }

    /// Number of frames currently allocated.
    pub fn live_frames(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Releases every frame that can't be reached from `root` or from the
    /// closures inside `live_values`. Returns how many frames were released.
    pub fn collect<'v>(&mut self, root: FrameId, live_values: impl IntoIterator<Item = &'v Value>) -> usize {
        let mut marked = vec![false; self.slots.len()];
        let mut pending = vec![root];
        live_values.into_iter().for_each(|value| push_frames_of(value, &mut pending));

        while let Some(id) = pending.pop() {
            let Some(frame) = self.frame(id) else { continue };
            if marked[id.index] { continue }
            marked[id.index] = true;

            pending.extend(frame.parent);
            frame.bindings.values().for_each(|value| push_frames_of(value, &mut pending));
        }

        let mut released = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.frame.is_some() && !marked[index] {
                slot.frame = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
                released += 1;
            }
        }

        trace!(released, live = self.live_frames(), "collected frames");
        released
    }
}

fn push_frames_of(value: &Value, pending: &mut Vec<FrameId>) {
    match value {
        Value::Closure(closure) => {
            pending.push(closure.environment());
            closure.body().iter().for_each(|value| push_frames_of(value, pending));
        },
        Value::List(list) => list.iter().for_each(|value| push_frames_of(value, pending)),
        Value::Integer(_)
        | Value::Float(_)
        | Value::Symbol(_)
        | Value::QuotedString(_)
        | Value::Error(_) => {}
    }
}
