use bpmn_protocol::SourceDocument;
use bpmn_search::{
    filter_results, group_results, search, ElementKind, SearchEngine, SearchQuery,
};
use pretty_assertions::assert_eq;

const NS: &str = r#"xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL""#;

fn doc(path: &str, process: &str, body: &str) -> SourceDocument {
    SourceDocument::new(
        path,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions {NS} id="Definitions_1">
  <bpmn:process id="Process_1" name="{process}" isExecutable="true">
    {body}
  </bpmn:process>
</bpmn:definitions>"#
        ),
    )
}

#[test]
fn reference_search_finds_call_activity_by_called_element() {
    let sources = vec![doc(
        "hr/onboarding.bpmn",
        "Onboarding",
        r#"<bpmn:startEvent id="start"/>
           <bpmn:callActivity id="ca1" name="Provision" calledElement="SubProcA"/>
           <bpmn:callActivity id="ca2" name="Other" calledElement="SubProcB"/>"#,
    )];

    let outcome = search(&sources, SearchQuery::reference("SubProcA")).unwrap();

    assert_eq!(outcome.results.len(), 1);
    let result = &outcome.results[0];
    assert_eq!(result.process_name, "Onboarding");
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].element_kind, ElementKind::CallActivity);
    assert_eq!(result.matches[0].element_id, "ca1");
}

#[test]
fn text_search_reports_only_the_matching_script_task() {
    let sources = vec![doc(
        "ops/cleanup.bpmn",
        "Cleanup",
        r#"<bpmn:scriptTask id="st1" name="Purge" scriptFormat="groovy">
             <bpmn:script>// TODO: batch the deletes
purge()</bpmn:script>
           </bpmn:scriptTask>
           <bpmn:scriptTask id="st2" name="Notify" scriptFormat="groovy">
             <bpmn:script>notify()</bpmn:script>
           </bpmn:scriptTask>"#,
    )];

    let outcome = search(&sources, SearchQuery::text("todo")).unwrap();

    assert_eq!(outcome.results.len(), 1);
    let matches = &outcome.results[0].matches;
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].element_kind, ElementKind::ScriptTask);
    assert_eq!(matches[0].element_id, "st1");
    assert_eq!(matches[0].label, "Script Task - Purge");
}

#[test]
fn unnamed_condition_is_labeled_with_flow_endpoints() {
    let sources = vec![doc(
        "sales/approval.bpmn",
        "Approval",
        r#"<bpmn:sequenceFlow id="Flow_7" sourceRef="A" targetRef="B">
             <bpmn:conditionExpression xsi:type="bpmn:tFormalExpression">${amount &gt; 1000}</bpmn:conditionExpression>
           </bpmn:sequenceFlow>"#,
    )];

    let outcome = search(&sources, SearchQuery::text("AMOUNT")).unwrap();

    let matches = &outcome.results[0].matches;
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].element_kind, ElementKind::ConditionExpression);
    assert_eq!(matches[0].label, "Condition Expression (A -> B)");
    assert_eq!(matches[0].element_id, "Flow_7");
    assert_eq!(matches[0].matched_text.as_deref(), Some("${amount > 1000}"));
}

#[test]
fn call_activity_reports_each_matching_value() {
    let sources = vec![doc(
        "orders/fulfil.bpmn",
        "Fulfilment",
        r#"<bpmn:callActivity id="ca9" name="Approve order" calledElement="ApproveOrderProcess"/>"#,
    )];

    let outcome = search(&sources, SearchQuery::text("approve")).unwrap();

    let matches = &outcome.results[0].matches;
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m.element_id == "ca9"));
    let texts: Vec<&str> = matches.iter().filter_map(|m| m.matched_text.as_deref()).collect();
    assert_eq!(texts, vec!["Approve order", "ApproveOrderProcess"]);
}

#[test]
fn identical_mapping_values_each_produce_a_match() {
    let sources = vec![doc(
        "billing/invoice.bpmn",
        "Invoicing",
        r#"<bpmn:callActivity id="ca3" calledElement="Archive">
             <bpmn:extensionElements>
               <camunda:in source="invoiceId" target="id"/>
               <camunda:in source="invoiceId" target="ref"/>
             </bpmn:extensionElements>
           </bpmn:callActivity>"#,
    )];

    let outcome = search(&sources, SearchQuery::text("invoiceid")).unwrap();

    assert_eq!(outcome.stats.matches, 2);
    let matches = &outcome.results[0].matches;
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m.element_id == "ca3"));
    assert!(matches
        .iter()
        .all(|m| m.matched_text.as_deref() == Some("invoiceId")));
}

#[test]
fn one_broken_document_does_not_affect_the_others() {
    let sources = vec![
        doc(
            "a.bpmn",
            "First",
            r#"<bpmn:callActivity id="ca1" calledElement="Shared"/>"#,
        ),
        SourceDocument::new("broken.bpmn", "<bpmn:definitions><bpmn:process></bpmn:definitions>"),
        doc(
            "b.bpmn",
            "Second",
            r#"<bpmn:callActivity id="ca2" calledElement="Shared"/>"#,
        ),
    ];

    let outcome = search(&sources, SearchQuery::reference("Shared")).unwrap();

    let names: Vec<&str> = outcome.results.iter().map(|r| r.process_name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second"]);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].path, "broken.bpmn");
}

#[test]
fn regrouping_engine_output_changes_nothing() {
    let sources = vec![
        doc(
            "a/flow.bpmn",
            "Flow",
            r#"<bpmn:scriptTask id="st"><bpmn:script>log("x")</bpmn:script></bpmn:scriptTask>
               <bpmn:callActivity id="ca" name="log sink" calledElement="Sink"/>"#,
        ),
        doc(
            "b/flow.bpmn",
            "Flow",
            r#"<bpmn:scriptTask id="st"><bpmn:script>log("y")</bpmn:script></bpmn:scriptTask>"#,
        ),
    ];

    let outcome = SearchEngine::new(SearchQuery::text("log")).run(&sources);

    assert_eq!(outcome.results.len(), 2);
    assert_eq!(group_results(outcome.results.clone()), outcome.results);
}

#[test]
fn empty_filter_keeps_every_result() {
    let sources = vec![
        doc("a.bpmn", "Alpha", r#"<bpmn:callActivity id="c" calledElement="X"/>"#),
        doc("b.bpmn", "Beta", r#"<bpmn:callActivity id="c" calledElement="X"/>"#),
    ];
    let outcome = search(&sources, SearchQuery::reference("X")).unwrap();

    assert_eq!(filter_results(&outcome.results, "").len(), 2);
    let beta: Vec<&str> = filter_results(&outcome.results, "beta")
        .iter()
        .map(|r| r.file_name.as_str())
        .collect();
    assert_eq!(beta, vec!["b.bpmn"]);
}
