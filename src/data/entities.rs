//! Reference data loader with hardcoded fallbacks.
//!
//! Every category is fetched from `/api/entities/{category}`. A failed fetch is
//! never fatal: the loader substitutes a fallback list when one exists so the
//! form stays usable while the metadata service is down.

use tracing::{info, warn};

use crate::api::ApiClient;
use crate::domain::{Category, ReferenceEntity};

/// Outcome of loading one category.
///
/// Callers can tell live data from defaults, and both from "nothing usable".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceData {
    Live(Vec<ReferenceEntity>),
    Fallback {
        entities: Vec<ReferenceEntity>,
        reason: String,
    },
    Empty {
        reason: String,
    },
}

impl ReferenceData {
    /// Options to offer, empty for `Empty`.
    pub fn entities(&self) -> &[ReferenceEntity] {
        match self {
            ReferenceData::Live(entities) => entities.as_slice(),
            ReferenceData::Fallback { entities, .. } => entities.as_slice(),
            ReferenceData::Empty { .. } => &[],
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, ReferenceData::Live(_))
    }

    /// User-facing warning for anything other than live data.
    pub fn warning(&self) -> Option<&str> {
        match self {
            ReferenceData::Live(_) => None,
            ReferenceData::Fallback { reason, .. } | ReferenceData::Empty { reason } => {
                Some(reason.as_str())
            }
        }
    }

    pub fn source_name(&self) -> &'static str {
        match self {
            ReferenceData::Live(_) => "live",
            ReferenceData::Fallback { .. } => "fallback",
            ReferenceData::Empty { .. } => "unavailable",
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entities().iter().map(|e| e.label.as_str()).collect()
    }
}

/// Reference data for all categories, loaded at startup and again on reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct References {
    pub sex: ReferenceData,
    /// Options come from the served smoker list when one is live, not from a
    /// fixed No/Yes pair. The No=0/Yes=1 fallback only applies when the
    /// fetch fails or returns nothing.
    pub smoker: ReferenceData,
    /// Fetched for visibility only; the region choice is fixed client-side
    /// because the one-hot payload depends on the exact four region names.
    pub region: ReferenceData,
}

impl References {
    /// Warnings for every category that is not live, in load order.
    pub fn warnings(&self) -> Vec<&str> {
        [&self.sex, &self.smoker, &self.region]
            .into_iter()
            .filter_map(|d| d.warning())
            .collect()
    }
}

/// Hardcoded options used when the service cannot provide a category.
pub fn fallback_entities(category: Category) -> Option<Vec<ReferenceEntity>> {
    match category {
        Category::Sex => Some(vec![
            ReferenceEntity::new("Male", 1),
            ReferenceEntity::new("Female", 0),
        ]),
        Category::Smoker => Some(vec![
            ReferenceEntity::new("No", 0),
            ReferenceEntity::new("Yes", 1),
        ]),
        Category::Region => None,
    }
}

/// Load one category, substituting the fallback on any failure.
pub fn load_reference(client: &ApiClient, category: Category) -> ReferenceData {
    info!(category = category.as_str(), url = %client.entities_url(category), "fetching reference entities");

    let failure = match client.fetch_entities(category) {
        Ok(entities) if !entities.is_empty() => {
            info!(category = category.as_str(), count = entities.len(), "loaded reference entities");
            return ReferenceData::Live(entities);
        }
        Ok(_) => format!("Could not fetch {category} entities: service returned an empty list."),
        Err(err) => {
            format!("Could not fetch {category} entities ({err}). Please check the API service.")
        }
    };

    match fallback_entities(category) {
        Some(entities) => {
            warn!(category = category.as_str(), reason = %failure, "using fallback reference entities");
            ReferenceData::Fallback {
                reason: format!("{failure} Using default options."),
                entities,
            }
        }
        None => {
            warn!(category = category.as_str(), reason = %failure, "no reference entities available");
            ReferenceData::Empty { reason: failure }
        }
    }
}

/// Load sex, smoker and region sequentially.
pub fn load_all(client: &ApiClient) -> References {
    References {
        sex: load_reference(client, Category::Sex),
        smoker: load_reference(client, Category::Smoker),
        region: load_reference(client, Category::Region),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HttpReply;
    use crate::api::testing::{FakeTransport, entities_body};

    fn client(fake: FakeTransport) -> ApiClient {
        ApiClient::new("http://svc", Box::new(fake))
    }

    #[test]
    fn live_data_is_tagged_live() {
        let fake = FakeTransport::new().on_get(
            "http://svc/api/entities/sex",
            HttpReply::new(200, entities_body("sex", &[("Female", 0), ("Male", 1)])),
        );
        let data = load_reference(&client(fake), Category::Sex);

        assert!(data.is_live());
        assert_eq!(data.labels(), vec!["Female", "Male"]);
        assert_eq!(data.warning(), None);
    }

    #[test]
    fn server_error_falls_back_for_sex() {
        let fake = FakeTransport::new()
            .on_get("http://svc/api/entities/sex", HttpReply::new(500, "internal error"));
        let data = load_reference(&client(fake), Category::Sex);

        assert_eq!(data.source_name(), "fallback");
        assert_eq!(data.labels(), vec!["Male", "Female"]);
        let warning = data.warning().unwrap();
        assert!(warning.contains("sex"), "{warning}");
        assert!(warning.contains("500"), "{warning}");
    }

    #[test]
    fn empty_list_falls_back_for_smoker() {
        let fake = FakeTransport::new().on_get(
            "http://svc/api/entities/smoker",
            HttpReply::new(200, entities_body("smoker", &[])),
        );
        let data = load_reference(&client(fake), Category::Smoker);

        assert_eq!(data.labels(), vec!["No", "Yes"]);
        assert!(data.warning().unwrap().contains("empty list"));
    }

    #[test]
    fn unreachable_region_is_empty() {
        let data = load_reference(&client(FakeTransport::new()), Category::Region);

        assert!(matches!(data, ReferenceData::Empty { .. }));
        assert!(data.entities().is_empty());
        assert!(data.warning().unwrap().contains("region"));
    }

    #[test]
    fn load_all_fetches_each_category_once_in_order() {
        let fake = FakeTransport::new();
        let log = fake.log();
        let refs = load_all(&client(fake));

        assert_eq!(
            log.gets(),
            vec![
                "http://svc/api/entities/sex",
                "http://svc/api/entities/smoker",
                "http://svc/api/entities/region",
            ]
        );
        assert_eq!(refs.warnings().len(), 3);
    }
}
