use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;

// Category and word catalog plus the tier-aware category selection. Kept separate so content
// tweaks stay isolated from the engine.

pub fn build_categories() -> Vec<Category> {
    vec![
        category(CategoryId::Food, "Comida", "🍔", AccessTier::Free),
        category(CategoryId::Places, "Lugar", "🏥", AccessTier::Free),
        category(CategoryId::Animals, "Animal", "🦒", AccessTier::Free),
        category(CategoryId::Objects, "Objeto", "☂️", AccessTier::Free),
        category(CategoryId::Professions, "Profesión", "👨‍🚀", AccessTier::Free),
        category(CategoryId::Transport, "Transporte", "✈️", AccessTier::Pro),
        category(CategoryId::Movies, "Cine", "🎬", AccessTier::Pro),
        category(CategoryId::Sports, "Deportes", "⚽", AccessTier::Pro),
        category(CategoryId::Music, "Música", "🎸", AccessTier::Pro),
        category(CategoryId::Spicy, "Picante", "🔥", AccessTier::Pro),
    ]
}

pub fn build_word_bank() -> Vec<WordEntry> {
    let mut words = Vec::new();
    words.extend(words_for(
        CategoryId::Food,
        &["Hamburguesa", "Sushi", "Pizza", "Tacos"],
    ));
    words.extend(words_for(
        CategoryId::Places,
        &["Hospital", "Cementerio", "Escuela", "Cine"],
    ));
    words.extend(words_for(
        CategoryId::Animals,
        &["Jirafa", "Pingüino", "Tiburón", "Elefante"],
    ));
    words.extend(words_for(
        CategoryId::Objects,
        &["Paraguas", "Espejo", "Reloj", "Tijeras"],
    ));
    words.extend(words_for(
        CategoryId::Professions,
        &["Astronauta", "Bombero", "Payaso", "Cirujano"],
    ));
    words.extend(words_for(
        CategoryId::Transport,
        &["Submarino", "Avión", "Bicicleta", "Tren"],
    ));
    words.extend(words_for(
        CategoryId::Movies,
        &["Titanic", "Harry Potter", "Shrek", "Star Wars"],
    ));
    words.extend(words_for(
        CategoryId::Sports,
        &["Fútbol", "Boxeo", "Natación", "Ajedrez"],
    ));
    words.extend(words_for(
        CategoryId::Music,
        &["Guitarra", "Karaoke", "Reguetón", "Batería"],
    ));
    words.extend(words_for(
        CategoryId::Spicy,
        &["Primera cita", "Beso", "Ex", "Despedida de soltero"],
    ));
    words
}

fn category(id: CategoryId, label: &str, emoji: &str, tier: AccessTier) -> Category {
    Category {
        id,
        label: label.to_string(),
        emoji: emoji.to_string(),
        tier,
    }
}

fn words_for(category: CategoryId, words: &[&str]) -> Vec<WordEntry> {
    words
        .iter()
        .map(|w| WordEntry {
            category,
            word: w.to_string(),
        })
        .collect()
}

pub fn categories() -> &'static [Category] {
    static CATEGORIES: OnceLock<Vec<Category>> = OnceLock::new();
    CATEGORIES.get_or_init(build_categories)
}

pub fn word_bank() -> &'static [WordEntry] {
    static WORDS: OnceLock<Vec<WordEntry>> = OnceLock::new();
    WORDS.get_or_init(build_word_bank)
}

pub fn find_category(id: CategoryId) -> Option<&'static Category> {
    categories().iter().find(|c| c.id == id)
}

pub fn tier_of(id: CategoryId) -> AccessTier {
    find_category(id).map(|c| c.tier).unwrap_or(AccessTier::Pro)
}

/// Words belonging to the selected categories. May be empty; callers decide the fallback.
pub fn word_pool(selection: &CategorySelection) -> Vec<&'static WordEntry> {
    word_bank()
        .iter()
        .filter(|w| selection.contains(w.category))
        .collect()
}

/// Allowed categories for the next round, always non-empty and always within the holder's tier.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CategorySelection {
    ids: BTreeSet<CategoryId>,
}

impl CategorySelection {
    pub fn new(requested: impl IntoIterator<Item = CategoryId>, tier: AccessTier) -> Self {
        let mut selection = Self {
            ids: requested.into_iter().collect(),
        };
        selection.restrict_to(tier);
        selection
    }

    pub fn default_free() -> Self {
        Self {
            ids: categories()
                .iter()
                .filter(|c| c.tier == AccessTier::Free)
                .map(|c| c.id)
                .collect(),
        }
    }

    /// Every category the tier may use.
    pub fn all_for(tier: AccessTier) -> Self {
        Self::new(categories().iter().map(|c| c.id), tier)
    }

    /// Drops categories the tier may not use, substituting the free defaults if nothing is left.
    pub fn restrict_to(&mut self, tier: AccessTier) {
        self.ids.retain(|id| tier.allows(tier_of(*id)));
        if self.ids.is_empty() {
            *self = Self::default_free();
        }
    }

    /// Flips one category. Returns whether anything changed: gated categories and removing the
    /// last remaining category are refused.
    pub fn toggle(&mut self, id: CategoryId, tier: AccessTier) -> bool {
        if self.ids.contains(&id) {
            if self.ids.len() == 1 {
                return false;
            }
            self.ids.remove(&id);
            return true;
        }
        if !tier.allows(tier_of(id)) {
            return false;
        }
        self.ids.insert(id)
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for CategorySelection {
    fn default() -> Self {
        Self::default_free()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_five_free_and_five_pro_categories() {
        let cats = categories();
        assert_eq!(cats.len(), 10);
        assert_eq!(cats.iter().filter(|c| c.tier == AccessTier::Free).count(), 5);
        assert_eq!(cats.iter().filter(|c| c.tier == AccessTier::Pro).count(), 5);
    }

    #[test]
    fn every_category_has_at_least_four_words() {
        for cat in categories() {
            let count = word_bank().iter().filter(|w| w.category == cat.id).count();
            assert!(count >= 4, "{:?} has only {} words", cat.id, count);
        }
    }

    #[test]
    fn free_tier_silently_drops_pro_categories() {
        let selection = CategorySelection::new(
            [CategoryId::Food, CategoryId::Movies, CategoryId::Spicy],
            AccessTier::Free,
        );
        assert!(selection.contains(CategoryId::Food));
        assert!(!selection.contains(CategoryId::Movies));
        assert!(!selection.contains(CategoryId::Spicy));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn free_tier_with_only_pro_requested_gets_default_free_set() {
        let selection = CategorySelection::new([CategoryId::Movies], AccessTier::Free);
        assert_eq!(selection, CategorySelection::default_free());
    }

    #[test]
    fn pro_tier_keeps_pro_categories() {
        let selection = CategorySelection::new([CategoryId::Movies], AccessTier::Pro);
        assert!(selection.contains(CategoryId::Movies));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn downgrade_filters_previous_pro_selection() {
        let mut selection = CategorySelection::all_for(AccessTier::Pro);
        assert_eq!(selection.len(), 10);
        selection.restrict_to(AccessTier::Free);
        assert_eq!(selection, CategorySelection::default_free());
    }

    #[test]
    fn toggle_refuses_gated_and_last_category() {
        let mut selection = CategorySelection::new([CategoryId::Food], AccessTier::Free);
        assert!(!selection.toggle(CategoryId::Music, AccessTier::Free));
        assert!(!selection.toggle(CategoryId::Food, AccessTier::Free));
        assert!(selection.toggle(CategoryId::Animals, AccessTier::Free));
        assert!(selection.toggle(CategoryId::Food, AccessTier::Free));
        assert_eq!(selection.ids().collect::<Vec<_>>(), vec![CategoryId::Animals]);
        assert!(selection.toggle(CategoryId::Music, AccessTier::Pro));
    }

    #[test]
    fn word_pool_is_restricted_to_selection() {
        let selection = CategorySelection::new([CategoryId::Animals], AccessTier::Free);
        let pool = word_pool(&selection);
        assert_eq!(pool.len(), 4);
        assert!(pool.iter().all(|w| w.category == CategoryId::Animals));
    }
}
