use api_alarms::core::composite::create_composite_alarms;
use api_alarms::core::naming::{self, alphanumeric};
use api_alarms::core::oncall::create_oncall_alarms;
use api_alarms::core::standard::create_standard_alarms;
use api_alarms::domain::model::{CompositeMappings, Endpoint, Family, MonitoringGroups, Severity};
use api_alarms::TransformConfig;
use proptest::prelude::*;

fn endpoints(count: usize) -> Vec<Endpoint> {
    (0..count)
        .map(|i| Endpoint::new(&format!("/resource/{}", i), "GET", &format!("op{}", i)))
        .collect()
}

fn config(alarm_on_4xx: bool) -> TransformConfig {
    TransformConfig::new("api", "unique", "svc", "usage").with_alarm_on_4xx(alarm_on_4xx)
}

proptest! {
    #[test]
    fn chunk_count_is_ceiling(count in 1usize..60) {
        for family in [Family::Standard, Family::OnCall] {
            let items = endpoints(count);
            let chunks: Vec<_> = naming::chunks("grp-a", &items, family).collect();
            let size = family.chunk_size();

            prop_assert_eq!(chunks.len(), count.div_ceil(size));
            let expected_last = if count % size == 0 { size } else { count % size };
            prop_assert_eq!(chunks.last().map(|c| c.endpoints.len()), Some(expected_last));

            // 每個 endpoint 恰好出現在一個 chunk，順序不變
            let flattened: Vec<&Endpoint> = chunks.iter().flat_map(|c| c.endpoints).collect();
            prop_assert_eq!(flattened, items.iter().collect::<Vec<_>>());
        }
    }

    #[test]
    fn composite_atoms_match_chunks(sizes in prop::collection::vec(1usize..25, 1..5), alarm_on_4xx in any::<bool>()) {
        let mut groups = MonitoringGroups::new();
        let mut mappings = CompositeMappings::new();
        for (i, size) in sizes.iter().enumerate() {
            let subgroup = format!("shop-part{}", i);
            groups.insert(subgroup.clone(), endpoints(*size));
            mappings.entry("shop".to_string()).or_default().insert(subgroup);
        }

        let config = config(alarm_on_4xx);
        let standard = create_standard_alarms(&groups, &config).unwrap();
        let oncall = create_oncall_alarms(&groups, &config).unwrap();
        let composites = create_composite_alarms(&mappings, &standard.names, &oncall.names, &config).unwrap();

        prop_assert_eq!(composites.len(), 2 * config.severities().len());

        for severity in config.severities() {
            for (family, base) in [(Family::Standard, &standard), (Family::OnCall, &oncall)] {
                let expected: usize = sizes.iter().map(|s| s.div_ceil(family.chunk_size())).sum();
                let logical_id = naming::composite_logical_id(family, severity, "shop");
                let (depends_on, properties) = composites[&logical_id].as_composite_alarm().unwrap();

                prop_assert_eq!(properties.alarm_rule().matches("ALARM(").count(), expected);
                prop_assert_eq!(depends_on.len(), expected);
                for dependency in depends_on {
                    prop_assert!(base.resources.contains_key(dependency));
                }
            }
        }

        if !alarm_on_4xx {
            prop_assert!(standard.names.names("shop-part0", Severity::FourXx).is_empty());
        }
    }

    #[test]
    fn alphanumeric_keeps_only_ascii_alnum(value in ".*") {
        let cleaned = alphanumeric(&value);
        prop_assert!(cleaned.chars().all(|c| c.is_ascii_alphanumeric()));
        prop_assert!(cleaned.len() <= value.len());
    }
}
