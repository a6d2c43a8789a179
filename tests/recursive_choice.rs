//! `spec.md` §8 concrete scenario 6: "A recursive CHOICE (leaf vs.
//! self-wrapper) round-trips three levels of nesting."
//!
//! Each `next` alternative wraps a SEQUENCE with its own fixed implicit tag
//! (so CHOICE alternative matching never has to look inside an
//! unmaterialized wrapper to find an identifier) containing one field that
//! is, itself, a freshly built instance of this same recursive CHOICE —
//! deferred behind a [`Wrapper`] thunk so building the schema never
//! recurses infinitely.

use std::rc::Rc;

use rasn1::prelude::*;

fn recursive_choice() -> Element {
    Element::Choice(Choice::new(
        Options::new(),
        vec![
            Alternative {
                name: "leaf".into(),
                element: Element::Primitive(Primitive::new(
                    Kind::Integer { enum_table: None },
                    Options::new(),
                )),
            },
            Alternative {
                name: "next".into(),
                element: Element::Wrapper(Box::new(Wrapper::new(
                    Options::new(),
                    Rc::new(next_sequence),
                ))),
            },
        ],
    ))
}

fn next_sequence() -> Element {
    Element::Constructed(Constructed::new(
        ConstructedKind::Sequence,
        Options::new().implicit(1),
        vec![Field {
            name: "inner".into(),
            element: recursive_choice(),
        }],
    ))
}

fn inner_choice_mut(element: &mut Element) -> &mut Choice {
    element
        .as_constructed_mut()
        .expect("next alternative is a Sequence")
        .get_mut("inner")
        .expect("Sequence has an inner field")
        .as_choice_mut()
        .expect("inner field is the recursive Choice")
}

#[test]
fn recursive_choice_round_trips_three_levels() {
    let mut top = recursive_choice();

    // level 0: select "next"
    let level0 = top.as_choice_mut().unwrap();
    let wrapper0 = level0.select("next").unwrap();
    let Element::Wrapper(wrapper0) = wrapper0 else {
        panic!("expected Wrapper");
    };

    // level 1: select "next" again, inside the materialized Sequence's Choice
    let level1 = inner_choice_mut(wrapper0.force_mut());
    let wrapper1 = level1.select("next").unwrap();
    let Element::Wrapper(wrapper1) = wrapper1 else {
        panic!("expected Wrapper");
    };

    // level 2: select "next" a third time
    let level2 = inner_choice_mut(wrapper1.force_mut());
    let wrapper2 = level2.select("next").unwrap();
    let Element::Wrapper(wrapper2) = wrapper2 else {
        panic!("expected Wrapper");
    };

    // level 3: bottom out in a leaf value
    let level3 = inner_choice_mut(wrapper2.force_mut());
    if let Some(Element::Primitive(leaf)) = level3.select("leaf") {
        leaf.set_value(Value::Integer(7.into())).unwrap();
    }

    let encoded = top.encode().unwrap();

    let mut decoded = recursive_choice();
    decoded.decode(&encoded, Codec::Der).unwrap();
    let re_encoded = decoded.encode().unwrap();
    assert_eq!(encoded, re_encoded);

    // Walk the decoded tree back down to the leaf and confirm the value.
    let d0 = decoded.as_choice().unwrap();
    let Element::Wrapper(w0) = &d0.chosen().unwrap().element else {
        panic!("expected next(Wrapper) at level 0");
    };
    let w0 = w0.project().unwrap();
    assert!(w0.lookup("inner.next").is_some());
}
