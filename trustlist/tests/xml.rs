//! Tests for the trust list XML decoder.

use trustlist::xml::{decode, TrustListNode};

#[test]
fn repeated_siblings_preserve_document_order() {
    let doc = r#"<Root><Item>a</Item><Other>x</Other><Item>b</Item><Item>c</Item></Root>"#;
    let root = decode(doc).unwrap();
    let items: Vec<&str> = root
        .children_named("Item")
        .iter()
        .map(|n| n.text_value().unwrap())
        .collect();
    assert_eq!(items, vec!["a", "b", "c"]);
    assert_eq!(
        root.first_named("Other").unwrap().text_value().unwrap(),
        "x"
    );
}

#[test]
fn tag_order_within_parent_is_insertion_order() {
    let doc = r#"<Root><B>1</B><A>2</A><C>3</C></Root>"#;
    let root = decode(doc).unwrap();
    match root {
        TrustListNode::Children(children) => {
            let tags: Vec<&String> = children.keys().collect();
            assert_eq!(tags, vec!["B", "A", "C"]);
        }
        TrustListNode::Leaf(_) => panic!("expected element children"),
    }
}

#[test]
fn leaf_text_is_verbatim() {
    let doc = "<Root><Name>  Example Trust B.V.  </Name></Root>";
    let root = decode(doc).unwrap();
    assert_eq!(
        root.first_named("Name").unwrap().text_value().unwrap(),
        "  Example Trust B.V.  "
    );
}

#[test]
fn entities_are_unescaped() {
    let doc = "<Root><Name>Black &amp; White</Name></Root>";
    let root = decode(doc).unwrap();
    assert_eq!(
        root.first_named("Name").unwrap().text_value().unwrap(),
        "Black & White"
    );
}

#[test]
fn namespace_prefixes_are_dropped() {
    let doc = r#"<tsl:Root xmlns:tsl="http://uri.etsi.org/02231/v2#"><tsl:Name>x</tsl:Name></tsl:Root>"#;
    let root = decode(doc).unwrap();
    assert_eq!(root.first_named("Name").unwrap().text_value().unwrap(), "x");
}

#[test]
fn empty_element_is_an_empty_leaf() {
    let doc = "<Root><Empty/></Root>";
    let root = decode(doc).unwrap();
    assert_eq!(
        root.first_named("Empty").unwrap().text_value().unwrap(),
        ""
    );
}

#[test]
fn children_named_on_missing_tag_is_empty() {
    let root = decode("<Root><A>1</A></Root>").unwrap();
    assert!(root.children_named("Missing").is_empty());
    assert!(root.first_named("Missing").is_none());
}

#[test]
fn text_value_of_branch_node_fails() {
    let root = decode("<Root><A>1</A></Root>").unwrap();
    assert!(root.text_value().is_err());
}

#[test]
fn unbalanced_document_is_malformed() {
    assert!(decode("<Root><A>1</A>").is_err());
    assert!(decode("<Root><A>1</B></Root>").is_err());
    assert!(decode("not xml at all").is_err());
    assert!(decode("").is_err());
}

#[test]
fn decodes_the_trust_list_fixture() {
    let doc = include_str!("examples/trust_list_nl.xml");
    let root = decode(doc).unwrap();
    let lists = root.children_named("TrustServiceProviderList");
    assert_eq!(lists.len(), 1);
    let providers = lists[0].children_named("TrustServiceProvider");
    assert_eq!(providers.len(), 1);
    let services = providers[0]
        .first_named("TSPServices")
        .unwrap()
        .children_named("TSPService");
    assert_eq!(services.len(), 2);
}
