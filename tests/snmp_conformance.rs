//! A conformance exercise shaped after an SNMPv1 GetResponse PDU
//! (`spec.md` §8's mention of SNMP as an external consumer): a CHOICE of
//! PDU types tagged `[0]`..`[4]` IMPLICIT, each a SEQUENCE of
//! request-id/error-status/error-index/variable-bindings, where
//! variable-bindings is a SEQUENCE OF (name, value) pairs and each binding
//! value is an ANY (the PDU doesn't know ahead of time whether a bound
//! variable is an INTEGER, OCTET STRING, or NULL).

use rasn1::prelude::*;

fn varbind_prototype() -> Element {
    Element::Constructed(Constructed::new(
        ConstructedKind::Sequence,
        Options::new(),
        vec![
            Field {
                name: "name".into(),
                element: Element::Primitive(Primitive::new(Kind::ObjectId, Options::new())),
            },
            Field {
                name: "value".into(),
                element: Element::Any(Any::new(Options::new())),
            },
        ],
    ))
}

fn pdu_fields() -> Vec<Field> {
    vec![
        Field {
            name: "requestId".into(),
            element: Element::Primitive(Primitive::new(Kind::Integer { enum_table: None }, Options::new())),
        },
        Field {
            name: "errorStatus".into(),
            element: Element::Primitive(Primitive::new(Kind::Integer { enum_table: None }, Options::new())),
        },
        Field {
            name: "errorIndex".into(),
            element: Element::Primitive(Primitive::new(Kind::Integer { enum_table: None }, Options::new())),
        },
        Field {
            name: "variableBindings".into(),
            element: Element::Repeated(Repeated::new(
                false,
                Options::new(),
                std::rc::Rc::new(varbind_prototype),
            )),
        },
    ]
}

fn pdu_choice() -> Element {
    Element::Choice(Choice::new(
        Options::new(),
        vec![
            Alternative {
                name: "get-request".into(),
                element: Element::Constructed(Constructed::new(
                    ConstructedKind::Sequence,
                    Options::new().implicit(0),
                    pdu_fields(),
                )),
            },
            Alternative {
                name: "get-response".into(),
                element: Element::Constructed(Constructed::new(
                    ConstructedKind::Sequence,
                    Options::new().implicit(2),
                    pdu_fields(),
                )),
            },
        ],
    ))
}

#[test]
fn get_response_pdu_round_trips_with_any_typed_bindings() {
    let mut pdu = pdu_choice();
    let response = pdu.as_choice_mut().unwrap().select("get-response").unwrap();
    let fields = response.as_constructed_mut().unwrap();

    fields.get_mut("requestId").unwrap().as_primitive_mut().unwrap()
        .set_value(Value::Integer(1.into())).unwrap();
    fields.get_mut("errorStatus").unwrap().as_primitive_mut().unwrap()
        .set_value(Value::Integer(0.into())).unwrap();
    fields.get_mut("errorIndex").unwrap().as_primitive_mut().unwrap()
        .set_value(Value::Integer(0.into())).unwrap();

    let bindings = fields.get_mut("variableBindings").unwrap().as_repeated_mut().unwrap();
    if let Element::Constructed(pair) = bindings.push_new() {
        pair.get_mut("name").unwrap().as_primitive_mut().unwrap()
            .set_value(Value::ObjectId(vec![1, 3, 6, 1, 2, 1, 1, 1, 0])).unwrap();
        let value_slot = pair.get_mut("value").unwrap().as_any_mut().unwrap();
        let mut typed = Primitive::new(Kind::OctetString, Options::new());
        typed.set_value(Value::OctetString(b"a system description".to_vec())).unwrap();
        value_slot.set_typed(Element::Primitive(typed));
    }

    let encoded = pdu.encode().unwrap();
    // get-response is IMPLICIT [2]: the PDU's own SEQUENCE identifier is
    // overwritten, so the wire identifier is a context, constructed tag 2.
    assert_eq!(encoded[0], 0xa2);

    let mut decoded = pdu_choice();
    decoded.parse(&encoded, Codec::Der).unwrap();
    assert_eq!(decoded.as_choice().unwrap().chosen().unwrap().name, "get-response");

    let projection = decoded.to_projection().unwrap();
    assert_eq!(
        projection
            .lookup("get-response.variableBindings.0.name")
            .unwrap()
            .as_leaf(),
        Some("1.3.6.1.2.1.1.1.0")
    );
}

#[test]
fn get_request_and_get_response_share_pdu_shape_but_differ_on_wire() {
    let mut get = pdu_choice();
    {
        let g = get.as_choice_mut().unwrap().select("get-request").unwrap();
        let fields = g.as_constructed_mut().unwrap();
        for name in ["requestId", "errorStatus", "errorIndex"] {
            fields.get_mut(name).unwrap().as_primitive_mut().unwrap()
                .set_value(Value::Integer(0.into())).unwrap();
        }
    }
    let encoded = get.encode().unwrap();
    assert_eq!(encoded[0], 0xa0);
}
