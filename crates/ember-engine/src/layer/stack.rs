use std::fmt;

use super::layer::Layer;

/// Handle returned when a layer is pushed; used to pop it again.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LayerId(u64);

struct Entry {
    id: LayerId,
    layer: Box<dyn Layer>,
}

fn layer_ref(entry: &Entry) -> &dyn Layer {
    entry.layer.as_ref()
}

fn layer_mut(entry: &mut Entry) -> &mut dyn Layer {
    entry.layer.as_mut()
}

/// Ordered composition of layers in two regions.
///
/// One sequence split at `insert_index`:
///
/// ```text
///   [ layer0, layer1, ... | overlay0, overlay1, ... ]
///                         ^ insert_index
/// ```
///
/// Forward order (update, UI-render) is layers in push order, then overlays in
/// push order. Reverse order (event delivery) therefore reaches the most
/// recently pushed overlay first and the first pushed layer last.
///
/// The stack owns its layers: `on_attach` fires on push, `on_detach` on pop
/// and when the stack is dropped (including during unwinding).
pub struct LayerStack {
    entries: Vec<Entry>,
    insert_index: usize,
    next_id: u64,
}

impl LayerStack {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            insert_index: 0,
            next_id: 0,
        }
    }

    /// Appends to the end of the layers region, before every overlay.
    pub fn push_layer(&mut self, layer: Box<dyn Layer>) -> LayerId {
        let entry = self.attach(layer);
        let id = entry.id;
        self.entries.insert(self.insert_index, entry);
        self.insert_index += 1;
        id
    }

    /// Appends to the end of the overlays region.
    pub fn push_overlay(&mut self, overlay: Box<dyn Layer>) -> LayerId {
        let entry = self.attach(overlay);
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// Removes a layer from the layers region. Ids of overlays, or of layers
    /// already popped, are ignored.
    pub fn pop_layer(&mut self, id: LayerId) -> Option<Box<dyn Layer>> {
        let pos = self.entries[..self.insert_index]
            .iter()
            .position(|e| e.id == id)?;

        let entry = self.entries.remove(pos);
        self.insert_index -= 1;
        Some(Self::detach(entry))
    }

    /// Removes an overlay from the overlays region. Ids of regular layers are
    /// ignored.
    pub fn pop_overlay(&mut self, id: LayerId) -> Option<Box<dyn Layer>> {
        let offset = self.entries[self.insert_index..]
            .iter()
            .position(|e| e.id == id)?;

        let entry = self.entries.remove(self.insert_index + offset);
        Some(Self::detach(entry))
    }

    /// Detaches every layer, last in forward order first.
    pub fn clear(&mut self) {
        while let Some(entry) = self.entries.pop() {
            Self::detach(entry);
        }
        self.insert_index = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn layer_count(&self) -> usize {
        self.insert_index
    }

    pub fn overlay_count(&self) -> usize {
        self.entries.len() - self.insert_index
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: LayerId) -> Option<&dyn Layer> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(layer_ref)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut dyn Layer> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .map(layer_mut)
    }

    /// Forward order: layers, then overlays. `.rev()` yields event order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &dyn Layer> {
        self.entries.iter().map(layer_ref)
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut dyn Layer> {
        self.entries.iter_mut().map(layer_mut)
    }

    /// Layer names in forward order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|l| l.name()).collect()
    }

    fn attach(&mut self, mut layer: Box<dyn Layer>) -> Entry {
        let id = LayerId(self.next_id);
        self.next_id += 1;

        log::debug!("attaching layer '{}'", layer.name());
        layer.on_attach();

        Entry { id, layer }
    }

    fn detach(mut entry: Entry) -> Box<dyn Layer> {
        log::debug!("detaching layer '{}'", entry.layer.name());
        entry.layer.on_detach();
        entry.layer
    }
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LayerStack {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for LayerStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (layers, overlays) = self.entries.split_at(self.insert_index);
        let names = |entries: &[Entry]| entries.iter().map(|e| e.layer.name().to_string()).collect::<Vec<_>>();

        f.debug_struct("LayerStack")
            .field("layers", &names(layers))
            .field("overlays", &names(overlays))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
    }

    impl Layer for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn on_attach(&mut self) {
            self.log.borrow_mut().push(format!("attach {}", self.name));
        }

        fn on_detach(&mut self) {
            self.log.borrow_mut().push(format!("detach {}", self.name));
        }
    }

    fn recorder(name: &'static str, log: &Log) -> Box<dyn Layer> {
        Box::new(Recorder { name, log: log.clone() })
    }

    fn forward(stack: &LayerStack) -> Vec<String> {
        stack.iter().map(|l| l.name().to_string()).collect()
    }

    fn reverse(stack: &LayerStack) -> Vec<String> {
        stack.iter().rev().map(|l| l.name().to_string()).collect()
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn overlays_follow_layers_regardless_of_push_interleaving() {
        let log = Log::default();
        let mut s = LayerStack::new();
        s.push_overlay(recorder("o1", &log));
        s.push_layer(recorder("l1", &log));
        s.push_overlay(recorder("o2", &log));
        s.push_layer(recorder("l2", &log));

        assert_eq!(forward(&s), ["l1", "l2", "o1", "o2"]);
        assert_eq!(reverse(&s), ["o2", "o1", "l2", "l1"]);
        assert_eq!(s.layer_count(), 2);
        assert_eq!(s.overlay_count(), 2);
    }

    #[test]
    fn layer_then_overlay() {
        let log = Log::default();
        let mut s = LayerStack::new();
        s.push_layer(recorder("A", &log));
        s.push_overlay(recorder("B", &log));
        assert_eq!(forward(&s), ["A", "B"]);
        assert_eq!(reverse(&s), ["B", "A"]);
    }

    // ── removal ───────────────────────────────────────────────────────────

    #[test]
    fn pop_keeps_relative_order() {
        let log = Log::default();
        let mut s = LayerStack::new();
        s.push_layer(recorder("l1", &log));
        let l2 = s.push_layer(recorder("l2", &log));
        s.push_layer(recorder("l3", &log));
        s.push_overlay(recorder("o1", &log));
        let o2 = s.push_overlay(recorder("o2", &log));
        s.push_overlay(recorder("o3", &log));

        assert!(s.pop_layer(l2).is_some());
        assert!(s.pop_overlay(o2).is_some());

        assert_eq!(forward(&s), ["l1", "l3", "o1", "o3"]);

        // The boundary moved with the removal: new layers still land before overlays.
        s.push_layer(recorder("l4", &log));
        assert_eq!(forward(&s), ["l1", "l3", "l4", "o1", "o3"]);
    }

    #[test]
    fn pop_absent_is_noop() {
        let log = Log::default();
        let mut s = LayerStack::new();
        let a = s.push_layer(recorder("a", &log));
        let b = s.push_overlay(recorder("b", &log));

        // Wrong region.
        assert!(s.pop_overlay(a).is_none());
        assert!(s.pop_layer(b).is_none());

        // Already removed.
        assert!(s.pop_layer(a).is_some());
        assert!(s.pop_layer(a).is_none());

        assert_eq!(forward(&s), ["b"]);
        assert_eq!(s.layer_count(), 0);
        assert_eq!(s.overlay_count(), 1);
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn attach_on_push_detach_on_pop() {
        let log = Log::default();
        let mut s = LayerStack::new();
        let a = s.push_layer(recorder("a", &log));
        assert_eq!(*log.borrow(), ["attach a"]);

        let popped = s.pop_layer(a);
        assert!(popped.is_some());
        assert_eq!(*log.borrow(), ["attach a", "detach a"]);

        drop(popped);
        drop(s);
        assert_eq!(log.borrow().len(), 2, "popped layers are not detached twice");
    }

    #[test]
    fn drop_detaches_in_reverse_forward_order() {
        let log = Log::default();
        {
            let mut s = LayerStack::new();
            s.push_layer(recorder("l1", &log));
            s.push_overlay(recorder("o1", &log));
            s.push_layer(recorder("l2", &log));
            log.borrow_mut().clear();
        }
        assert_eq!(*log.borrow(), ["detach o1", "detach l2", "detach l1"]);
    }

    #[test]
    fn get_by_id() {
        let log = Log::default();
        let mut s = LayerStack::new();
        let a = s.push_layer(recorder("a", &log));
        assert_eq!(s.get(a).map(|l| l.name()), Some("a"));
        assert!(s.get_mut(a).is_some());
        assert!(s.contains(a));
    }
}
