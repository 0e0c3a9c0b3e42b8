//! Shared test utilities and fixtures for checklist parser tests

use crate::constants::markers;
use std::collections::HashMap;


/// Builder for synthetic checklist pages using the real page markers
#[derive(Debug, Clone)]
pub struct ChecklistPageBuilder {
    date: String,
    location: String,
    owner: String,
    other_participants: Vec<String>,
    protocol: String,
    duration: Option<String>,
    distance: Option<String>,
    sublists: Vec<Vec<(String, String)>>,
}

impl Default for ChecklistPageBuilder {
    fn default() -> Self {
        Self {
            date: "2020-10-24".to_string(),
            location: "Jamaica Bay Wildlife Refuge".to_string(),
            owner: "Ada Lovelace".to_string(),
            other_participants: Vec::new(),
            protocol: "Traveling".to_string(),
            duration: Some("1 h, 30 min".to_string()),
            distance: Some("2.5 mi".to_string()),
            sublists: vec![Vec::new()],
        }
    }
}

impl ChecklistPageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    pub fn owner(mut self, owner: &str) -> Self {
        self.owner = owner.to_string();
        self
    }

    pub fn other_participant(mut self, name: &str) -> Self {
        self.other_participants.push(name.to_string());
        self
    }

    /// Set the protocol; stationary drops the distance badge, incidental
    /// drops both effort badges
    pub fn protocol(mut self, protocol: &str) -> Self {
        self.protocol = protocol.to_string();
        match protocol {
            "Traveling" => {}
            "Stationary" => self.distance = None,
            _ => {
                self.duration = None;
                self.distance = None;
            }
        }
        self
    }

    pub fn duration(mut self, duration: Option<&str>) -> Self {
        self.duration = duration.map(str::to_string);
        self
    }

    pub fn distance(mut self, distance: Option<&str>) -> Self {
        self.distance = distance.map(str::to_string);
        self
    }

    /// Add a species line to the most recent sub-list
    pub fn species(mut self, name: &str, count: &str) -> Self {
        if let Some(list) = self.sublists.last_mut() {
            list.push((name.to_string(), count.to_string()));
        }
        self
    }

    /// Start an "additional species" sub-list from a shared checklist
    pub fn shared_sublist(mut self) -> Self {
        self.sublists.push(Vec::new());
        self
    }

    pub fn build(&self) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html><head><title>eBird Checklist</title></head><body>\n",
        );

        html.push_str(&format!(
            "<div class=\"SectionHeading\">{}{}T07:15\">{}</time></div>\n",
            markers::DATE_OPEN, self.date, self.date
        ));
        html.push_str(&format!(
            "<div>{}<span>{}</span></div>\n",
            markers::LOCATION_LABEL,
            self.location
        ));
        html.push_str(&format!(
            "<div>{}<span>{}</span></div>\n",
            markers::OWNER_LABEL,
            self.owner
        ));

        if !self.other_participants.is_empty() {
            html.push_str(&format!(
                "<div><h6>{}</h6>\n<ul class=\"Breadcrumbs Breadcrumbs--comma\">\n",
                markers::OTHER_PARTICIPANTS_LABEL
            ));
            for name in &self.other_participants {
                html.push_str(&format!(
                    "<li>{}{}</span></li>\n",
                    markers::PARTICIPANT_OPEN,
                    name
                ));
            }
            html.push_str("</ul></div>\n");
        }

        html.push_str(&format!(
            "<div>{}{}</span>\n",
            markers::PROTOCOL_OPEN,
            self.protocol
        ));
        if let Some(duration) = &self.duration {
            html.push_str(&format!("{}{}</span>\n", markers::DURATION_OPEN, duration));
        }
        if let Some(distance) = &self.distance {
            html.push_str(&format!("{}{}</span>\n", markers::DISTANCE_OPEN, distance));
        }
        html.push_str("</div>\n");

        html.push_str(markers::SPECIES_LIST_START);
        html.push('\n');
        for (index, list) in self.sublists.iter().enumerate() {
            if index > 0 {
                html.push_str(&format!(
                    "{}Additional species from a shared checklist</h3>\n",
                    markers::ADDITIONAL_SPECIES
                ));
            }
            for (name, count) in list {
                html.push_str(&species_section(name, count));
            }
        }
        html.push_str("</div>\n");
        html.push_str(markers::SPECIES_LIST_END);
        html.push_str("<p>eBird</p></div>\n</body></html>\n");

        html
    }
}

/// Render one species section
pub fn species_section(name: &str, count: &str) -> String {
    format!(
        "{}\n<h5 class=\"Heading\">{}{}</span></h5>\n<div>{}<span>{}</span></div>\n{}\n",
        markers::SECTION_OPEN,
        markers::SPECIES_NAME_OPEN,
        name,
        markers::NUMBER_OBSERVED_LABEL,
        count,
        markers::SECTION_CLOSE
    )
}

/// Taxonomy covering every species used by the parser fixtures
pub fn create_test_taxonomy() -> HashMap<String, u32> {
    [
        ("Canada Goose", 280),
        ("Mallard", 336),
        ("American Black Duck", 343),
        ("duck sp.", 400),
        ("Greater/Lesser Scaup", 411),
        ("Cooper's Hawk", 8560),
        ("Dark-eyed Junco", 31712),
        ("Dark-eyed Junco (Slate-colored)", 31720),
    ]
    .into_iter()
    .map(|(name, order)| (name.to_string(), order))
    .collect()
}
