// ============================================================================
// LAYER LIST — names, visibility, the single active layer
// ============================================================================

use uuid::Uuid;

pub type LayerId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub active: bool,
}

/// Ordered list of layers. Whenever the list is non-empty exactly one layer
/// is active; the last remaining layer cannot be removed.
#[derive(Debug, Clone)]
pub struct LayerList {
    layers: Vec<Layer>,
    /// Counter for default names ("Layer 2", "Layer 3", ...)
    next_number: usize,
}

impl Default for LayerList {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerList {
    /// A list holding a single active "Layer 1".
    pub fn new() -> Self {
        let mut list = Self {
            layers: Vec::new(),
            next_number: 1,
        };
        list.add(None);
        list
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> + '_ {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn active(&self) -> Option<&Layer> {
        self.layers.iter().find(|l| l.active)
    }

    pub fn active_id(&self) -> Option<LayerId> {
        self.active().map(|l| l.id)
    }

    /// Unknown layers count as hidden.
    pub fn is_visible(&self, id: LayerId) -> bool {
        self.get(id).is_some_and(|l| l.visible)
    }

    /// Append a new layer and make it the active one.
    pub fn add(&mut self, name: Option<String>) -> LayerId {
        let id = Uuid::new_v4();
        let name = name.unwrap_or_else(|| format!("Layer {}", self.next_number));
        self.next_number += 1;
        for layer in &mut self.layers {
            layer.active = false;
        }
        self.layers.push(Layer {
            id,
            name,
            visible: true,
            active: true,
        });
        id
    }

    /// Remove a layer. Refused for unknown ids and for the last layer.
    /// If the active layer goes, its nearest neighbour becomes active.
    pub fn remove(&mut self, id: LayerId) -> bool {
        if self.layers.len() <= 1 {
            return false;
        }
        let Some(idx) = self.layers.iter().position(|l| l.id == id) else {
            return false;
        };
        let removed = self.layers.remove(idx);
        if removed.active {
            let next = idx.min(self.layers.len() - 1);
            self.layers[next].active = true;
        }
        true
    }

    pub fn set_active(&mut self, id: LayerId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        for layer in &mut self.layers {
            layer.active = layer.id == id;
        }
        true
    }

    /// Flip visibility; returns the new state, `None` for unknown ids.
    pub fn toggle_visibility(&mut self, id: LayerId) -> Option<bool> {
        let layer = self.layers.iter_mut().find(|l| l.id == id)?;
        layer.visible = !layer.visible;
        Some(layer.visible)
    }

    pub fn rename(&mut self, id: LayerId, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }
        match self.layers.iter_mut().find(|l| l.id == id) {
            Some(layer) => {
                layer.name = trimmed.to_string();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_count(list: &LayerList) -> usize {
        list.iter().filter(|l| l.active).count()
    }

    #[test]
    fn starts_with_one_active_layer() {
        let list = LayerList::new();
        assert_eq!(list.len(), 1);
        assert_eq!(active_count(&list), 1);
        assert_eq!(list.active().map(|l| l.name.as_str()), Some("Layer 1"));
    }

    #[test]
    fn adding_moves_activity_to_new_layer() {
        let mut list = LayerList::new();
        let second = list.add(None);
        assert_eq!(list.active_id(), Some(second));
        assert_eq!(active_count(&list), 1);
        assert_eq!(list.get(second).map(|l| l.name.as_str()), Some("Layer 2"));
    }

    #[test]
    fn removing_active_layer_hands_over() {
        let mut list = LayerList::new();
        let first = list.active_id().unwrap();
        let second = list.add(Some("Outline".into()));

        assert!(list.remove(second));
        assert_eq!(list.active_id(), Some(first));
        assert_eq!(active_count(&list), 1);
        assert!(!list.remove(first), "last layer stays");
    }

    #[test]
    fn set_active_is_exclusive() {
        let mut list = LayerList::new();
        let first = list.active_id().unwrap();
        let _ = list.add(None);
        let _ = list.add(None);
        assert!(list.set_active(first));
        assert_eq!(active_count(&list), 1);
        assert!(!list.set_active(Uuid::new_v4()));
        assert_eq!(list.active_id(), Some(first));
    }

    #[test]
    fn visibility_and_rename() {
        let mut list = LayerList::new();
        let id = list.active_id().unwrap();
        assert_eq!(list.toggle_visibility(id), Some(false));
        assert!(!list.is_visible(id));
        assert!(!list.is_visible(Uuid::new_v4()));

        assert!(list.rename(id, "  Shading "));
        assert_eq!(list.get(id).unwrap().name, "Shading");
        assert!(!list.rename(id, "   "));
    }
}
