use blockcraft_common::{Material, ParseMaterialError};

/// Material picker bound to the number keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotbar {
    slots: Vec<Material>,
    selected: usize,
}

impl Default for Hotbar {
    fn default() -> Self {
        Self::new(vec![
            Material::Grass,
            Material::Dirt,
            Material::Stone,
            Material::Wood,
            Material::Leaf,
        ])
    }
}

impl Hotbar {
    /// Build a hotbar from slot contents. An empty list gets a single grass slot.
    pub fn new(mut slots: Vec<Material>) -> Self {
        if slots.is_empty() {
            slots.push(Material::Grass);
        }
        Self { slots, selected: 0 }
    }

    pub fn slots(&self) -> &[Material] {
        &self.slots
    }

    pub fn selected_slot(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Material {
        self.slots[self.selected]
    }

    /// Select a slot by its one-based number key. Missing slots are ignored.
    pub fn select_number(&mut self, number: u8) -> bool {
        let Some(index) = usize::from(number).checked_sub(1) else {
            return false;
        };
        if index >= self.slots.len() {
            return false;
        }
        self.selected = index;
        tracing::debug!(slot = number, material = %self.selected(), "hotbar selection");
        true
    }

    /// Select the first slot holding the named material.
    pub fn select_name(&mut self, name: &str) -> Result<bool, ParseMaterialError> {
        let material: Material = name.parse()?;
        Ok(self.select_material(material))
    }

    pub fn select_material(&mut self, material: Material) -> bool {
        match self.slots.iter().position(|m| *m == material) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }
}
