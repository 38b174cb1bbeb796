use std::any::Any;

use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use xmlb::{
    AccessorKind, AccessorRef, Bean, BeanBinding, Binding, BindingError, ConfigurationError,
    Element, EncodeContext, FormatError, Members, Node, NodeKind, NodeRef, SerializerOptions,
    XmlSerializer, bean, bindable_bean, bindable_scalar,
};

// ── Fixtures ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

bean! {
    Point {
        field x;
        field y;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ReversedPoint {
    x: i32,
    y: i32,
}

bean! {
    ReversedPoint as "Point" {
        field y;
        field x;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Renamed {
    x: i32,
}

bean! {
    Renamed as "Foo" {
        field x;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Session {
    user: String,
    cache: String,
}

bean! {
    Session {
        field user;
        field cache [transient];
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Label {
    id: u32,
    lang: String,
    value: String,
}

bean! {
    Label {
        field id [attribute];
        field lang [attribute, tag = "xml-lang"];
        field value [text];
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
enum Shape {
    #[default]
    Circle,
    Square,
}

bindable_scalar!(Shape);

#[derive(Debug, Clone, Default, PartialEq)]
struct Drawing {
    title: Option<String>,
    shape: Shape,
    origin: Point,
    points: Vec<Point>,
    tags: Vec<String>,
    scale: Option<f64>,
}

bean! {
    Drawing {
        field title;
        field shape;
        field origin;
        field points;
        field tags;
        field scale;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct TreeNode {
    name: String,
    children: Vec<TreeNode>,
}

bean! {
    TreeNode as "node" {
        field name [attribute];
        field children;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Ambiguous {
    a: i32,
    b: i32,
}

bean! {
    Ambiguous {
        field a [tag = "v"];
        field b [tag = "v"];
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct TwoTexts {
    a: String,
    b: String,
}

bean! {
    TwoTexts {
        field a [text];
        field b [text];
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct BadTag {
    value: i32,
}

bean! {
    BadTag {
        field value [tag = "1st"];
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ListAsAttribute {
    items: Vec<i32>,
}

bean! {
    ListAsAttribute {
        field items [attribute];
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Sealed {
    value: i32,
}

impl Bean for Sealed {
    fn instantiate() -> Result<Self, ConfigurationError> {
        Err(ConfigurationError::Instantiation {
            bean: "Sealed",
            reason: "no public constructor".to_owned(),
        })
    }

    fn describe(members: &mut Members<Self>) {
        members.field("value", |bean| &bean.value, |bean| &mut bean.value);
    }
}

bindable_bean!(Sealed);

#[derive(Debug, Clone, Default, PartialEq)]
struct Temperature {
    millis: i64,
    kind: String,
}

impl Temperature {
    fn celsius(&self) -> f64 {
        self.millis as f64 / 1000.0
    }

    fn set_celsius(&mut self, value: f64) {
        self.millis = (value * 1000.0).round() as i64;
    }

    fn class(&self) -> String {
        "Temperature".to_owned()
    }

    fn set_class(&mut self, _value: String) {}
}

bean! {
    Temperature {
        field millis [transient];
        field kind;
        property celsius(Temperature::celsius, Temperature::set_celsius);
        property class(Temperature::class, Temperature::set_class);
    }
}

fn text_child(name: &str, text: &str) -> Element {
    Element::new(name).with_text(text)
}

// ── Encoding ───────────────────────────────────────────────────────────────

#[test]
fn test_point_encodes_sorted_members() {
    let element = XmlSerializer::new().serialize(&Point { x: 3, y: 4 }).unwrap();
    let expected = Element::new("Point")
        .with_child(text_child("x", "3"))
        .with_child(text_child("y", "4"));
    assert_eq!(element, expected);
    assert_eq!(element.to_string(), "<Point><x>3</x><y>4</y></Point>");
}

#[test]
fn test_point_roundtrip() {
    let serializer = XmlSerializer::new();
    let point = Point { x: -12, y: 40 };
    let element = serializer.serialize(&point).unwrap();
    assert_eq!(serializer.deserialize::<Point>(&element).unwrap(), point);
}

#[test]
fn test_declaration_order_does_not_change_output() {
    let serializer = XmlSerializer::new();
    let a = serializer.serialize(&Point { x: 1, y: 2 }).unwrap();
    let b = serializer.serialize(&ReversedPoint { x: 1, y: 2 }).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_encoding_is_deterministic() {
    let serializer = XmlSerializer::new();
    let point = Point { x: 7, y: 8 };
    let first = serializer.to_xml_string(&point).unwrap();
    for _ in 0..10 {
        assert_eq!(serializer.to_xml_string(&point).unwrap(), first);
    }
}

#[test]
fn test_tag_override() {
    let serializer = XmlSerializer::new();
    let element = serializer.serialize(&Renamed { x: 1 }).unwrap();
    assert_eq!(element.to_string(), "<Foo><x>1</x></Foo>");

    let wrong = Element::new("Renamed").with_child(text_child("x", "1"));
    let err = serializer.deserialize::<Renamed>(&wrong).unwrap_err();
    assert!(matches!(err, BindingError::Misrouted { ref expected, .. } if expected == "Foo"));

    let binding = BeanBinding::<Renamed>::new().unwrap();
    assert!(binding.is_bound_to(NodeRef::Element(&Element::new("Foo"))));
    assert!(!binding.is_bound_to(NodeRef::Element(&Element::new("Renamed"))));
    assert_eq!(binding.bound_name(), Some("Foo"));
}

#[test]
fn test_empty_bean_encodes_empty_element() {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Empty;

    bean! { Empty {} }

    let serializer = XmlSerializer::new();
    let element = serializer.serialize(&Empty).unwrap();
    assert_eq!(element, Element::new("Empty"));
    assert_eq!(serializer.deserialize::<Empty>(&element).unwrap(), Empty);
}

#[test]
fn test_attribute_and_text_members() {
    let serializer = XmlSerializer::new();
    let label = Label {
        id: 7,
        lang: "en".to_owned(),
        value: "Hello & bye".to_owned(),
    };
    let element = serializer.serialize(&label).unwrap();
    assert_eq!(element.attribute("id"), Some("7"));
    assert_eq!(element.attribute("xml-lang"), Some("en"));
    assert_eq!(element.text(), "Hello & bye");
    assert_eq!(
        element.to_string(),
        r#"<Label id="7" xml-lang="en">Hello &amp; bye</Label>"#
    );
    assert_eq!(serializer.deserialize::<Label>(&element).unwrap(), label);
}

#[test]
fn test_unknown_attribute_is_rejected() {
    let element = Element::new("Label")
        .with_attribute("id", "1")
        .with_attribute("color", "red");
    let err = XmlSerializer::new().deserialize::<Label>(&element).unwrap_err();
    match err {
        BindingError::Format(FormatError::UnboundNode { parent, node, position }) => {
            assert_eq!(parent, "Label");
            assert_eq!(node, "@color");
            assert_eq!(position, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_nested_collections_and_options() {
    let serializer = XmlSerializer::new();
    let drawing = Drawing {
        title: None,
        shape: Shape::Square,
        origin: Point { x: 0, y: 1 },
        points: vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }],
        tags: vec!["a".to_owned(), "b".to_owned()],
        scale: Some(1.5),
    };
    let element = serializer.serialize(&drawing).unwrap();
    assert_eq!(
        element.to_string(),
        concat!(
            "<Drawing>",
            "<origin><Point><x>0</x><y>1</y></Point></origin>",
            "<points><Point><x>1</x><y>2</y></Point><Point><x>3</x><y>4</y></Point></points>",
            "<scale>1.5</scale>",
            "<shape>Square</shape>",
            "<tags><item>a</item><item>b</item></tags>",
            "</Drawing>"
        )
    );
    assert_eq!(serializer.deserialize::<Drawing>(&element).unwrap(), drawing);
}

#[test]
fn test_empty_collection_roundtrip() {
    let serializer = XmlSerializer::new();
    let drawing = Drawing::default();
    let element = serializer.serialize(&drawing).unwrap();
    let points = element.child_elements().find(|e| e.name() == "points").unwrap();
    assert!(points.children().is_empty());
    assert_eq!(serializer.deserialize::<Drawing>(&element).unwrap(), drawing);
}

#[test]
fn test_unknown_item_in_collection_is_rejected() {
    let element = Element::new("Drawing").with_child(
        Element::new("tags")
            .with_child(text_child("item", "a"))
            .with_child(text_child("entry", "b")),
    );
    let err = XmlSerializer::new().deserialize::<Drawing>(&element).unwrap_err();
    assert!(matches!(
        err,
        BindingError::Format(FormatError::UnboundNode { ref parent, position: 1, .. }) if parent == "tags"
    ));
}

#[test]
fn test_recursive_bean() {
    let serializer = XmlSerializer::new();
    let tree = TreeNode {
        name: "root".to_owned(),
        children: vec![
            TreeNode {
                name: "leaf".to_owned(),
                children: vec![],
            },
            TreeNode {
                name: "branch".to_owned(),
                children: vec![TreeNode {
                    name: "twig".to_owned(),
                    children: vec![],
                }],
            },
        ],
    };
    let xml = serializer.to_xml_string(&tree).unwrap();
    assert_eq!(
        xml,
        concat!(
            r#"<node name="root"><children>"#,
            r#"<node name="leaf"><children/></node>"#,
            r#"<node name="branch"><children><node name="twig"><children/></node></children></node>"#,
            "</children></node>"
        )
    );
    let element = serializer.serialize(&tree).unwrap();
    assert_eq!(serializer.deserialize::<TreeNode>(&element).unwrap(), tree);
}

#[test]
fn test_property_accessor_and_class_member() {
    let serializer = XmlSerializer::new();
    let reading = Temperature {
        millis: 21_500,
        kind: "air".to_owned(),
    };
    let element = serializer.serialize(&reading).unwrap();
    assert_eq!(
        element.to_string(),
        "<Temperature><celsius>21.5</celsius><kind>air</kind></Temperature>"
    );
    assert_eq!(serializer.deserialize::<Temperature>(&element).unwrap(), reading);

    let with_class = element.clone().with_child(text_child("class", "Temperature"));
    assert!(serializer.deserialize::<Temperature>(&with_class).is_err());
}

#[test]
fn test_descriptor_lists_members_in_order() {
    let binding = BeanBinding::<Temperature>::new().unwrap();
    let descriptor = binding.descriptor();
    assert_eq!(descriptor.tag_name(), "Temperature");
    let names: Vec<_> = descriptor.properties().map(|p| p.name().to_owned()).collect();
    assert_eq!(names, ["celsius", "kind"]);
    assert_eq!(
        descriptor.property("celsius").unwrap().accessor().kind,
        AccessorKind::Property
    );
    assert_eq!(descriptor.property("kind").unwrap().accessor().kind, AccessorKind::Field);
    assert!(descriptor.property("millis").is_none());
}

// ── Decoding ───────────────────────────────────────────────────────────────

#[test]
fn test_unknown_child_is_rejected() {
    let element = Element::new("Point")
        .with_child(text_child("x", "1"))
        .with_child(text_child("z", "9"));
    let err = XmlSerializer::new().deserialize::<Point>(&element).unwrap_err();
    let format = err.as_format().expect("format error");
    assert!(format.to_string().contains("<z>"), "{format}");
    assert!(matches!(format, FormatError::UnboundNode { position: 1, .. }));
}

#[test]
fn test_stray_text_is_rejected() {
    let element = Element::new("Point")
        .with_child(text_child("x", "1"))
        .with_text("noise");
    let err = XmlSerializer::new().deserialize::<Point>(&element).unwrap_err();
    assert!(matches!(err, BindingError::Format(FormatError::UnboundNode { .. })));
}

#[test]
fn test_missing_member_keeps_default() {
    let element = Element::new("Point").with_child(text_child("y", "5"));
    let point: Point = XmlSerializer::new().deserialize(&element).unwrap();
    assert_eq!(point, Point { x: 0, y: 5 });
}

#[test]
fn test_child_order_is_irrelevant_on_decode() {
    let element = Element::new("Point")
        .with_child(text_child("y", "2"))
        .with_child(text_child("x", "1"));
    let point: Point = XmlSerializer::new().deserialize(&element).unwrap();
    assert_eq!(point, Point { x: 1, y: 2 });
}

#[test]
fn test_duplicate_child_is_a_cardinality_error() {
    let element = Element::new("Point")
        .with_child(text_child("x", "1"))
        .with_child(text_child("x", "2"));
    let err = XmlSerializer::new().deserialize::<Point>(&element).unwrap_err();
    assert!(matches!(
        err,
        BindingError::Format(FormatError::Cardinality { found: 2, .. })
    ));
}

#[test]
fn test_invalid_scalar_text() {
    let element = Element::new("Point").with_child(text_child("x", "three"));
    let err = XmlSerializer::new().deserialize::<Point>(&element).unwrap_err();
    assert!(matches!(
        err,
        BindingError::Format(FormatError::InvalidValue { ref text, .. }) if text == "three"
    ));
}

#[test]
fn test_unexpected_child_inside_member_element() {
    let element = Element::new("Point").with_child(
        Element::new("x").with_child(Element::new("nested")),
    );
    let err = XmlSerializer::new().deserialize::<Point>(&element).unwrap_err();
    assert!(matches!(
        err,
        BindingError::Format(FormatError::UnboundNode { ref parent, .. }) if parent == "x"
    ));
}

#[test]
fn test_misrouted_input() {
    let binding = BeanBinding::<Point>::new().unwrap();

    let other = Element::new("Other");
    let err = binding.decode(&other).unwrap_err();
    assert!(matches!(err, BindingError::Misrouted { .. }));

    let err = binding.deserialize(&[NodeRef::Text("3")]).unwrap_err();
    assert!(matches!(err, BindingError::Misrouted { .. }));

    let a = Element::new("Point");
    let b = Element::new("Point");
    let err = binding
        .deserialize(&[NodeRef::Element(&a), NodeRef::Element(&b)])
        .unwrap_err();
    assert!(matches!(err, BindingError::Misrouted { .. }));
}

#[test]
fn test_bean_binding_matching() {
    let binding = BeanBinding::<Point>::new().unwrap();
    let point = Element::new("Point");
    let other = Element::new("point");
    assert!(binding.is_bound_to(NodeRef::Element(&point)));
    assert!(!binding.is_bound_to(NodeRef::Element(&other)));
    assert!(!binding.is_bound_to(NodeRef::Text("Point")));
    assert_eq!(binding.bound_node_kind(), NodeKind::Element);
}

#[test]
fn test_bean_binding_serialize_returns_element() {
    let binding = BeanBinding::<Point>::new().unwrap();
    let mut parent = Element::document();
    let node = binding
        .serialize(&Point { x: 1, y: 1 }, &mut parent, &EncodeContext::default())
        .unwrap();
    assert!(matches!(node, Some(Node::Element(ref e)) if e.name() == "Point"));
    assert!(parent.children().is_empty());
}

// ── Transient members and filters ──────────────────────────────────────────

#[test]
fn test_transient_member_is_never_bound() {
    let serializer = XmlSerializer::new();
    let session = Session {
        user: "ana".to_owned(),
        cache: "warm".to_owned(),
    };
    let element = serializer.serialize(&session).unwrap();
    assert_eq!(element.to_string(), "<Session><user>ana</user></Session>");

    let decoded: Session = serializer.deserialize(&element).unwrap();
    assert_eq!(decoded.cache, "");

    let with_cache = element.with_child(text_child("cache", "warm"));
    let err = serializer.deserialize::<Session>(&with_cache).unwrap_err();
    assert!(matches!(err, BindingError::Format(FormatError::UnboundNode { .. })));
}

#[test]
fn test_closure_filter_drops_member() {
    let serializer = XmlSerializer::new()
        .with_filter(|accessor: &AccessorRef<'_>, _bean: &dyn Any| accessor.name != "y");
    let element = serializer.serialize(&Point { x: 3, y: 4 }).unwrap();
    assert_eq!(element.to_string(), "<Point><x>3</x></Point>");

    let decoded: Point = serializer.deserialize(&element).unwrap();
    assert_eq!(decoded, Point { x: 3, y: 0 });
}

#[test]
fn test_filter_sees_bean_instance() {
    let serializer = XmlSerializer::new().with_filter(|accessor: &AccessorRef<'_>, bean: &dyn Any| {
        match bean.downcast_ref::<Point>() {
            Some(point) => !(accessor.name == "x" && point.x == 0),
            None => true,
        }
    });
    let element = serializer.serialize(&Point { x: 0, y: 1 }).unwrap();
    assert_eq!(element.to_string(), "<Point><y>1</y></Point>");
    let element = serializer.serialize(&Point { x: 2, y: 1 }).unwrap();
    assert_eq!(element.to_string(), "<Point><x>2</x><y>1</y></Point>");
}

#[test]
fn test_filter_applies_to_nested_beans() {
    let serializer = XmlSerializer::new()
        .with_filter(|accessor: &AccessorRef<'_>, _bean: &dyn Any| accessor.name != "x");
    let drawing = Drawing {
        origin: Point { x: 5, y: 6 },
        ..Drawing::default()
    };
    let element = serializer.serialize(&drawing).unwrap();
    let origin = element.child_elements().find(|e| e.name() == "origin").unwrap();
    assert_eq!(origin.to_string(), "<origin><Point><y>6</y></Point></origin>");
}

#[test]
fn test_options_from_json() {
    let options: SerializerOptions =
        serde_json::from_str(r#"{ "exclude_members": ["y"], "indent": 2 }"#).unwrap();
    assert_eq!(options.exclude_members, ["y"]);
    let serializer = XmlSerializer::from_options(&options);
    let xml = serializer.to_xml_string(&Point { x: 3, y: 4 }).unwrap();
    assert_eq!(xml, "<Point>\n  <x>3</x>\n</Point>\n");

    let element = XmlSerializer::new().serialize(&Point { x: 3, y: 4 }).unwrap();
    assert_eq!(format!("{}", element.pretty(2)), "<Point>\n  <x>3</x>\n  <y>4</y>\n</Point>\n");

    assert!(serde_json::from_str::<SerializerOptions>(r#"{ "indnet": 2 }"#).is_err());
    assert_eq!(
        serde_json::from_str::<SerializerOptions>("{}").unwrap(),
        SerializerOptions::default()
    );
}

// ── Configuration errors ───────────────────────────────────────────────────

#[test]
fn test_ambiguous_members_are_rejected() {
    let err = XmlSerializer::new().serialize(&Ambiguous::default()).unwrap_err();
    match err.as_configuration() {
        Some(ConfigurationError::AmbiguousBinding { first, second, kind, name, .. }) => {
            assert_eq!((first.as_str(), second.as_str()), ("a", "b"));
            assert_eq!(*kind, NodeKind::Element);
            assert_eq!(name, "v");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_two_text_members_are_ambiguous() {
    let err = BeanBinding::<TwoTexts>::new().err().unwrap();
    assert!(matches!(
        err,
        ConfigurationError::AmbiguousBinding { kind: NodeKind::Text, .. }
    ));
}

#[test]
fn test_invalid_member_tag_is_rejected() {
    let err = BeanBinding::<BadTag>::new().err().unwrap();
    assert_eq!(err, ConfigurationError::InvalidTagName("1st".to_owned()));
}

#[test]
fn test_collection_as_attribute_is_rejected() {
    let err = BeanBinding::<ListAsAttribute>::new().err().unwrap();
    assert!(matches!(
        err,
        ConfigurationError::InvalidMember { ref member, .. } if member == "items"
    ));
}

#[test]
fn test_duplicate_member_is_rejected() {
    #[derive(Debug, Clone, Default)]
    struct Twice {
        a: i32,
    }

    bean! {
        Twice {
            field a;
            field a [tag = "other"];
        }
    }

    let err = BeanBinding::<Twice>::new().err().unwrap();
    assert!(matches!(err, ConfigurationError::DuplicateMember { ref member, .. } if member == "a"));
}

#[test]
fn test_optional_collection_items_are_rejected() {
    #[derive(Debug, Clone, Default)]
    struct Holder {
        items: Vec<Option<i32>>,
    }

    bean! {
        Holder {
            field items;
        }
    }

    let err = BeanBinding::<Holder>::new().err().unwrap();
    assert!(matches!(err, ConfigurationError::InvalidMember { ref member, .. } if member == "items"));

    let holder = Holder {
        items: vec![None, Some(1), None],
    };
    assert!(XmlSerializer::new().serialize(&holder).is_err());
}

#[test]
fn test_nested_option_is_rejected() {
    #[derive(Debug, Clone, Default)]
    struct Maybe {
        nested: Option<Option<String>>,
    }

    bean! {
        Maybe {
            field nested;
        }
    }

    let err = BeanBinding::<Maybe>::new().err().unwrap();
    assert!(matches!(err, ConfigurationError::InvalidMember { ref member, .. } if member == "nested"));
}

#[test]
fn test_optional_collection_is_accepted() {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Survey {
        answers: Option<Vec<i32>>,
    }

    bean! {
        Survey {
            field answers;
        }
    }

    let serializer = XmlSerializer::new();
    for survey in [
        Survey { answers: None },
        Survey { answers: Some(vec![]) },
        Survey { answers: Some(vec![3, 1]) },
    ] {
        let element = serializer.serialize(&survey).unwrap();
        assert_eq!(serializer.deserialize::<Survey>(&element).unwrap(), survey);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Misnamed {
    value: i32,
}

bean! {
    Misnamed as "1x" {
        field value;
    }
}

#[test]
fn test_nested_bean_errors_surface_with_enclosing_descriptor() {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Outer {
        inner: Option<Misnamed>,
    }

    bean! {
        Outer {
            field inner;
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Roster {
        entries: Vec<Misnamed>,
    }

    bean! {
        Roster {
            field entries;
        }
    }

    let expected = ConfigurationError::InvalidTagName("1x".to_owned());
    assert_eq!(BeanBinding::<Outer>::new().err(), Some(expected.clone()));
    assert_eq!(BeanBinding::<Roster>::new().err(), Some(expected.clone()));

    let err = XmlSerializer::new().serialize(&Outer { inner: None }).unwrap_err();
    assert_eq!(err.as_configuration(), Some(&expected));
}

#[test]
fn test_mutually_recursive_beans() {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Team {
        name: String,
        lead: Option<Person>,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Person {
        name: String,
        teams: Vec<Team>,
    }

    bean! {
        Team {
            field name [attribute];
            field lead;
        }
    }

    bean! {
        Person {
            field name [attribute];
            field teams;
        }
    }

    let serializer = XmlSerializer::new();
    let team = Team {
        name: "core".to_owned(),
        lead: Some(Person {
            name: "ana".to_owned(),
            teams: vec![Team {
                name: "infra".to_owned(),
                lead: None,
            }],
        }),
    };
    let element = serializer.serialize(&team).unwrap();
    assert_eq!(
        element.to_string(),
        concat!(
            r#"<Team name="core"><lead><Person name="ana"><teams>"#,
            r#"<Team name="infra"/>"#,
            "</teams></Person></lead></Team>"
        )
    );
    assert_eq!(serializer.deserialize::<Team>(&element).unwrap(), team);
}

#[test]
fn test_instantiation_failure_surfaces_before_input_checks() {
    let serializer = XmlSerializer::new();
    let element = serializer.serialize(&Sealed { value: 1 }).unwrap();
    assert_eq!(element.to_string(), "<Sealed><value>1</value></Sealed>");

    for input in [element, Element::new("Unrelated")] {
        let err = serializer.deserialize::<Sealed>(&input).unwrap_err();
        assert!(matches!(
            err,
            BindingError::Configuration(ConfigurationError::Instantiation { .. })
        ));
    }
}

// ── Concurrency ────────────────────────────────────────────────────────────

#[test]
fn test_concurrent_use_shares_descriptor() {
    let serializer = XmlSerializer::new();
    std::thread::scope(|scope| {
        for i in 0..8 {
            let serializer = &serializer;
            scope.spawn(move || {
                let point = Point { x: i, y: i * 2 };
                let element = serializer.serialize(&point).unwrap();
                assert_eq!(serializer.deserialize::<Point>(&element).unwrap(), point);
            });
        }
    });
    let a = xmlb::registry::descriptor::<Point>().unwrap();
    let b = xmlb::registry::descriptor::<Point>().unwrap();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}
