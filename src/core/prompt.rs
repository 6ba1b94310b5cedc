use crate::core::UserPreferences;
use crate::utils::error::{Result, SommelierError};

pub const NOT_SPECIFIED: &str = "Not specified";
pub const NO_TASTE_PREFERENCES: &str = "No specific preferences";

pub fn meal_pairing_prompt(prefs: &UserPreferences) -> String {
    let description = if prefs.meal_description.trim().is_empty() {
        NOT_SPECIFIED
    } else {
        prefs.meal_description.as_str()
    };

    let tastes = if prefs.taste_profile.is_empty() {
        NO_TASTE_PREFERENCES.to_string()
    } else {
        prefs
            .taste_profile
            .iter()
            .map(|tag| tag.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "As an expert sommelier, recommend 3 wines for the following:

Meal Type: {meal}
Dish Description: {description}
Occasion: {occasion}
Number of Guests: {guests}
Preferred Wine Type: {wine_type}
Price Range: {price}
Taste Preferences: {tastes}

For each wine recommendation, provide:
1. Wine name and type
2. Why it pairs well with this meal
3. Tasting notes
4. Approximate price range
5. Serving suggestions

Format your response in a clear, conversational way.",
        meal = prefs.meal_type,
        description = description,
        occasion = prefs.occasion,
        guests = prefs.guest_count,
        wine_type = prefs.wine_type,
        price = prefs.price_range,
        tastes = tastes,
    )
}

/// Fails with [`SommelierError::EmptyQuestion`] for blank input. Otherwise the
/// question is inserted exactly as typed.
pub fn question_prompt(question: &str) -> Result<String> {
    if question.trim().is_empty() {
        return Err(SommelierError::EmptyQuestion);
    }

    Ok(format!(
        "You are an expert sommelier. Answer this question in a helpful, friendly, and knowledgeable way:

{question}

Provide practical advice and interesting facts where relevant."
    ))
}
