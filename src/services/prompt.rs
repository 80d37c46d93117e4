use crate::domain::Platform;

/// Builds the instruction sent to the model for the free-games listing.
pub fn build_games_prompt(platforms: &str, allowed_hosts: &[&str]) -> String {
    let platform_values = Platform::ALL
        .iter()
        .map(|p| format!("'{}'", p.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    let hosts = allowed_hosts.join(", ");

    format!(
        r#"Give me the list of free or claimable games available right now on the following platforms: {platforms}.
I need the response to be ONLY a raw JSON array, without any additional text, explanations, or markdown formatting like ```json.
Each game object in the array must have these exact properties:
- 'title': The full and exact title of the game (string).
- 'platform': The platform the game is on (string). It must be exactly one of: {platform_values}.
- 'dealLink': The direct HTTPS URL to the game's store or claim page (string).
- 'imageURL': A direct, publicly accessible HTTPS URL for the game's cover art (string).
   VERY IMPORTANT: You MUST ONLY use image URLs from the following allowed domains: {hosts}. Do NOT use any other domain. If you cannot find an image from an allowed domain, do not include the game in the list.
- 'endDate': The date the deal ends in ISO 8601 format, if available (string, optional).
- 'original_price': The standard retail price before the discount (e.g., "$19.99"). This can be an empty string if not applicable or not found (string).

If you cannot find the required data for a game, omit that game. Never guess or invent values.
If a platform has no free games, do not include it.
Your entire response must be just the JSON array, starting with [ and ending with ]."#
    )
}

pub fn build_preview_prompt(title: &str) -> String {
    format!(
        r#"You are an assistant that finds YouTube gameplay previews for video games.
Search YouTube for a relevant gameplay video of the game below and extract its video ID.
Respond with ONLY a JSON object of the form {{"youtubeVideoId": "<id>"}} and nothing else.

Game Title: {}"#,
        title.trim()
    )
}
