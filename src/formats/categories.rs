use crate::domain::Category;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Synonym table mapping historical and alternate column spellings onto the
/// canonical category vocabulary. Built once; consumers look up through
/// [`category_for_column`] instead of carrying their own lists.
pub static CATEGORY_SYNONYMS: Lazy<HashMap<&'static str, Category>> = Lazy::new(|| {
    use Category::*;
    [
        ("burnable", Burnable),
        ("burnables", Burnable),
        ("burnable_dates", Burnable),
        ("combustible", Burnable),
        ("non_burnable", NonBurnable),
        ("nonburnable", NonBurnable),
        ("nonBurnable", NonBurnable),
        ("non_burnable_dates", NonBurnable),
        ("incombustible", NonBurnable),
        ("recyclable", Recyclable),
        ("recyclables", Recyclable),
        ("recycling", Recyclable),
        ("resource", Recyclable),
        ("resources", Recyclable),
        ("resource_dates", Recyclable),
        ("bottles", Bottles),
        ("bottle", Bottles),
        ("bottles_dates", Bottles),
        ("bin", Bottles),
        ("cans", Cans),
        ("can", Cans),
        ("cans_dates", Cans),
        ("kan", Cans),
        ("plastics", Plastics),
        ("plastic", Plastics),
        ("plastic_packaging", Plastics),
        ("container_plastics", Plastics),
        ("pet_bottles", PetBottles),
        ("pet_bottle", PetBottles),
        ("petbottles", PetBottles),
        ("pet", PetBottles),
        ("paper_and_cloth", PaperAndCloth),
        ("paper_cloth", PaperAndCloth),
        ("paper", PaperAndCloth),
        ("old_paper", PaperAndCloth),
        ("cloth", PaperAndCloth),
        ("old_cloth", PaperAndCloth),
        ("hazardous_and_dangerous", HazardousAndDangerous),
        ("hazardous", HazardousAndDangerous),
        ("dangerous", HazardousAndDangerous),
        ("harmful", HazardousAndDangerous),
        ("cooking_oil", CookingOil),
        ("waste_cooking_oil", CookingOil),
        ("waste_oil", CookingOil),
        ("oil", CookingOil),
    ]
    .into_iter()
    .collect()
});

pub fn category_for_column(name: &str) -> Option<Category> {
    CATEGORY_SYNONYMS.get(name).copied()
}

/// Parses a comma-separated day-list cell, keeping only days in [1,31]
pub fn parse_day_list(cell: &str) -> Vec<u32> {
    cell.split(',')
        .filter_map(|token| token.trim().parse::<u32>().ok())
        .filter(|day| (1..=31).contains(day))
        .collect()
}
