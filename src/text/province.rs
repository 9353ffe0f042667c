//! Location inference from free text.

use std::sync::Arc;

use crate::artifacts::{ProvinceId, ProvinceMap, UNKNOWN_PROVINCE};

/// Maps text to a province by alias substring search.
///
/// Aliases are tried in the order they appear in the province map file and
/// the **first** alias contained in the lowercased text wins.  This is not a
/// longest or most-specific match: a short alias listed early shadows a more
/// specific one listed later.  Resolution never fails; it falls back to the
/// `UNKNOWN` province.
#[derive(Debug, Clone)]
pub struct ProvinceResolver {
    provinces: Arc<ProvinceMap>,
}

impl ProvinceResolver {
    pub fn new(provinces: Arc<ProvinceMap>) -> Self {
        Self { provinces }
    }

    /// Province name matched by `text`, or `"UNKNOWN"`.
    pub fn resolve_name(&self, text: &str) -> &str {
        let lower = text.to_lowercase();
        self.provinces
            .aliases()
            .find(|(alias, _)| lower.contains(alias))
            .map(|(_, province)| province)
            .unwrap_or(UNKNOWN_PROVINCE)
    }

    /// Province id for `text`; unmapped names fall back to `UNKNOWN`'s id.
    pub fn resolve(&self, text: &str) -> ProvinceId {
        self.locate(text).1
    }

    /// Name and id together, from a single alias scan.
    pub fn locate(&self, text: &str) -> (&str, ProvinceId) {
        let name = self.resolve_name(text);
        let id = self
            .provinces
            .id_of(name)
            .unwrap_or_else(|| self.provinces.unknown_id());
        (name, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(json: &str) -> ProvinceResolver {
        let map = ProvinceMap::from_json(serde_json::from_str(json).unwrap()).unwrap();
        ProvinceResolver::new(Arc::new(map))
    }

    fn zambia() -> ProvinceResolver {
        resolver(
            r#"{"UNKNOWN": 0, "Lusaka": 1, "Copperbelt": 2,
                "__reverse__": {"lusaka": "Lusaka", "kitwe": "Copperbelt", "ndola": "Copperbelt"}}"#,
        )
    }

    #[test]
    fn alias_match_is_case_insensitive() {
        let r = zambia();
        assert_eq!(r.resolve("Looking for a room in LUSAKA"), ProvinceId(1));
        assert_eq!(r.resolve_name("Lodge in Ndola please"), "Copperbelt");
    }

    #[test]
    fn no_match_resolves_to_unknown() {
        let r = zambia();
        assert_eq!(r.resolve("house in Chipata"), ProvinceId(0));
        assert_eq!(r.resolve_name("house in Chipata"), "UNKNOWN");
        assert_eq!(r.resolve(""), ProvinceId(0));
    }

    #[test]
    fn earlier_alias_in_file_order_wins() {
        // Both aliases occur; "ndola" comes first in the file even though
        // "lusaka" comes first in the text.
        let r = resolver(
            r#"{"UNKNOWN": 0, "Lusaka": 1, "Copperbelt": 2,
                "__reverse__": {"ndola": "Copperbelt", "lusaka": "Lusaka"}}"#,
        );
        assert_eq!(r.resolve("moving from lusaka to ndola"), ProvinceId(2));
    }

    #[test]
    fn short_alias_listed_first_shadows_specific_one() {
        let r = resolver(
            r#"{"UNKNOWN": 0, "Central": 3, "Lusaka": 1,
                "__reverse__": {"ka": "Central", "lusaka": "Lusaka"}}"#,
        );
        assert_eq!(r.resolve("lusaka"), ProvinceId(3));
    }

    #[test]
    fn alias_to_unmapped_province_falls_back_to_unknown_id() {
        let r = resolver(r#"{"UNKNOWN": 5, "__reverse__": {"mongu": "Western"}}"#);
        assert_eq!(r.resolve_name("room in mongu"), "Western");
        assert_eq!(r.resolve("room in mongu"), ProvinceId(5));
    }

    #[test]
    fn locate_pairs_name_with_id() {
        let r = zambia();
        assert_eq!(r.locate("bedspace near Kitwe"), ("Copperbelt", ProvinceId(2)));
        assert_eq!(r.locate("anything"), ("UNKNOWN", ProvinceId(0)));
    }
}
