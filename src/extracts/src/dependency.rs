use psdelta_common::types::ServiceNamed;
use std::collections::{HashMap, HashSet};

/// Orders services so that each one is stopped before the services it depends on.
///
/// Only edges between members of `services` are considered. The graph is not
/// checked for cycles: a node already visited is skipped, so a cycle still
/// yields every member exactly once. Duplicate names keep their first entry.
pub fn order_for_stop<'a, S, I>(services: I, graph: &HashMap<String, Vec<String>>) -> Vec<&'a S>
where
    S: ServiceNamed + ?Sized + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let mut members: Vec<&'a S> = Vec::new();
    let mut by_name: HashMap<&'a str, &'a S> = HashMap::new();
    for service in services {
        if !by_name.contains_key(service.service_name()) {
            by_name.insert(service.service_name(), service);
            members.push(service);
        }
    }

    let mut visited: HashSet<&'a str> = HashSet::new();
    let mut finished: Vec<&'a S> = Vec::with_capacity(members.len());
    for service in &members {
        visit(service.service_name(), &by_name, graph, &mut visited, &mut finished);
    }

    finished.reverse();
    finished
}

fn visit<'a, S: ServiceNamed + ?Sized>(
    name: &'a str,
    by_name: &HashMap<&'a str, &'a S>,
    graph: &HashMap<String, Vec<String>>,
    visited: &mut HashSet<&'a str>,
    finished: &mut Vec<&'a S>,
) {
    if !visited.insert(name) {
        return;
    }

    if let Some(dependencies) = graph.get(name) {
        for dependency in dependencies {
            if let Some((&member, _)) = by_name.get_key_value(dependency.as_str()) {
                visit(member, by_name, graph, visited, finished);
            }
        }
    }

    if let Some(&service) = by_name.get(name) {
        finished.push(service);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psdelta_common::types::{ServiceDelta, ServiceRecord, ServiceStatus};

    fn record(name: &str) -> ServiceRecord {
        ServiceRecord {
            service_name: name.into(),
            display_name: name.into(),
            status: ServiceStatus::Running,
        }
    }

    fn graph(edges: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        edges
            .iter()
            .map(|(from, to)| {
                (
                    from.to_string(),
                    to.iter().map(|name| name.to_string()).collect(),
                )
            })
            .collect()
    }

    fn order<S: ServiceNamed>(services: &[S], graph: &HashMap<String, Vec<String>>) -> Vec<String> {
        order_for_stop(services, graph)
            .into_iter()
            .map(|svc| svc.service_name().to_string())
            .collect()
    }

    fn position(order: &[String], name: &str) -> usize {
        order.iter().position(|n| n == name).unwrap()
    }

    #[test]
    fn dependent_stops_before_its_dependency() {
        let services = vec![record("A"), record("B"), record("C")];
        let result = order(&services, &graph(&[("A", &["B"])]));

        assert_eq!(result.len(), 3);
        assert!(position(&result, "A") < position(&result, "B"));
        assert!(result.contains(&"C".to_string()));
    }

    #[test]
    fn dependency_listed_first_still_stops_last() {
        let services = vec![record("B"), record("A")];
        let result = order(&services, &graph(&[("A", &["B"])]));
        assert_eq!(result, vec!["A", "B"]);
    }

    #[test]
    fn chains_are_fully_ordered() {
        let services = vec![record("Db"), record("Api"), record("Web")];
        let result = order(&services, &graph(&[("Web", &["Api"]), ("Api", &["Db"])]));
        assert_eq!(result, vec!["Web", "Api", "Db"]);
    }

    #[test]
    fn edges_leaving_the_set_are_ignored() {
        let services = vec![record("Spooler")];
        let result = order(&services, &graph(&[("Spooler", &["RPCSS", "http"])]));
        assert_eq!(result, vec!["Spooler"]);
    }

    #[test]
    fn cycles_yield_each_member_once() {
        let services = vec![record("X"), record("Y"), record("Z")];
        let result = order(
            &services,
            &graph(&[("X", &["Y"]), ("Y", &["Z"]), ("Z", &["X"])]),
        );

        let mut sorted = result.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["X", "Y", "Z"]);
    }

    #[test]
    fn duplicates_appear_once() {
        let services = vec![record("A"), record("A"), record("B")];
        let result = order(&services, &graph(&[]));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn works_on_delta_entries() {
        let deltas = vec![
            ServiceDelta {
                service_name: "BITS".into(),
                display_name: "Background Intelligent Transfer Service".into(),
                status_before: ServiceStatus::Stopped,
                status_after: ServiceStatus::Running,
            },
            ServiceDelta {
                service_name: "DoSvc".into(),
                display_name: "Delivery Optimization".into(),
                status_before: ServiceStatus::Stopped,
                status_after: ServiceStatus::Running,
            },
        ];
        let result = order(&deltas, &graph(&[("DoSvc", &["BITS"])]));
        assert_eq!(result, vec!["DoSvc", "BITS"]);
    }

    #[test]
    fn empty_input_is_empty() {
        let none: Vec<ServiceRecord> = Vec::new();
        assert!(order(&none, &graph(&[("A", &["B"])])).is_empty());
    }
}
