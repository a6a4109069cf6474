use chrono::NaiveDate;
use serde::Serialize;

use crate::data::model::Player;
use crate::units::{age_on, Age};

/// One labelled value shown on a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardDetail {
    pub label: &'static str,
    pub value: String,
}

/// Display-ready summary of one player, with derived fields filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerCard {
    /// Image lookup key.
    pub player_id: String,
    pub name: String,
    /// Only non-empty fields, in display order.
    pub details: Vec<CardDetail>,
    pub age: Option<Age>,
    /// `"Draft: 2003 – Round 1, Pick 1"`, when a draft year is known.
    pub draft: Option<String>,
}

impl PlayerCard {
    pub fn new(player: &Player, today: NaiveDate) -> Self {
        let age = player.birthday.as_deref().map(|b| age_on(b, today));

        let mut details = Vec::new();
        let mut push = |label, value: String| {
            if !value.is_empty() {
                details.push(CardDetail { label, value });
            }
        };
        push("Position", player.position.clone());
        push("Height", player.height.clone().unwrap_or_default());
        push(
            "Weight",
            player.weight.map(|w| format!("{w} lbs")).unwrap_or_default(),
        );
        push("Age", age.map(|a| a.to_string()).unwrap_or_default());
        push("Country", player.country.clone());
        push("School", player.school.clone());

        let draft = player.draft_year.map(|year| {
            format!(
                "Draft: {year} – Round {}, Pick {}",
                player.draft_round.unwrap_or(0),
                player.draft_number.unwrap_or(0)
            )
        });

        PlayerCard {
            player_id: player.player_id.clone(),
            name: player.full_name(),
            details,
            age,
            draft,
        }
    }

    /// `<player_id>.<ext>`, the file an image store would hold for this card.
    pub fn image_file_name(&self, ext: &str) -> String {
        format!("{}.{ext}", self.player_id)
    }

    /// Details joined into a single line.
    pub fn detail_line(&self) -> String {
        self.details
            .iter()
            .map(|d| format!("{}: {}", d.label, d.value))
            .collect::<Vec<_>>()
            .join("  •  ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player {
            player_id: "0977".into(),
            first_name: "Kobe".into(),
            last_name: "Bryant".into(),
            position: "G".into(),
            country: "USA".into(),
            school: String::new(),
            height: Some("6-6".into()),
            weight: Some(212.0),
            birthday: Some("1978-08-23".into()),
            draft_year: Some(1996),
            draft_round: Some(1),
            draft_number: Some(13),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 4, 13).unwrap()
    }

    #[test]
    fn card_lists_present_fields_in_order() {
        let card = PlayerCard::new(&player(), today());
        assert_eq!(card.name, "Kobe Bryant");
        let labels: Vec<_> = card.details.iter().map(|d| d.label).collect();
        assert_eq!(labels, vec!["Position", "Height", "Weight", "Age", "Country"]);
        assert_eq!(
            card.detail_line(),
            "Position: G  •  Height: 6-6  •  Weight: 212 lbs  •  Age: 37  •  Country: USA"
        );
        assert_eq!(card.draft.as_deref(), Some("Draft: 1996 – Round 1, Pick 13"));
        assert_eq!(card.image_file_name("png"), "0977.png");
    }

    #[test]
    fn bad_birthday_shows_sentinel() {
        let mut p = player();
        p.birthday = Some("23/08/1978".into());
        let card = PlayerCard::new(&p, today());
        assert_eq!(card.age, Some(Age::Unknown));
        assert!(card.detail_line().contains("Age: —"));
    }

    #[test]
    fn undrafted_player_has_no_caption() {
        let mut p = player();
        p.draft_year = None;
        p.draft_round = None;
        p.birthday = None;
        let card = PlayerCard::new(&p, today());
        assert_eq!(card.draft, None);
        assert_eq!(card.age, None);
    }

    #[test]
    fn missing_round_and_pick_render_as_zero() {
        let mut p = player();
        p.draft_round = None;
        p.draft_number = None;
        let card = PlayerCard::new(&p, today());
        assert_eq!(card.draft.as_deref(), Some("Draft: 1996 – Round 0, Pick 0"));
    }
}
