use std::{cell::Cell, rc::Rc};

use argot::{Capture, Error, Nargs, Parser, Slot, Status, Tags, ValueError};

fn flag_parser() -> (Parser, Slot<bool>) {
    let mut parser = Parser::new("prog");
    let arg = parser
        .begin_optional(Tags::LongShort {
            long: "arg",
            short: 'a',
        })
        .unwrap()
        .set_type_flag()
        .end();

    (parser, arg)
}

#[test]
fn flag_forms() {
    let (mut parser, arg) = flag_parser();

    for tokens in [["-a"], ["-a=1"], ["--arg"], ["--arg=1"]] {
        let mut capture = Capture::new();
        assert_eq!(
            parser.parse_with(&tokens, &mut capture).unwrap(),
            Status::Complete
        );
        assert!(arg.get(), "{tokens:?}");
    }

    for tokens in [["-a=0"], ["--arg=0"]] {
        let mut capture = Capture::new();
        parser.parse_with(&tokens, &mut capture).unwrap();
        assert!(!arg.get(), "{tokens:?}");
        assert!(parser.arguments().all(|argument| argument.was_specified()));
    }
}

#[test]
fn flag_rejects_other_values() {
    let (mut parser, _) = flag_parser();

    for token in ["-a=x", "-a=", "-a=abcd", "--arg=yes"] {
        let mut capture = Capture::new();
        let result = parser.parse_with(&[token], &mut capture);

        assert!(matches!(result, Err(Error::Parse)), "{token}");
        assert!(
            capture.err_text().contains("invalid value for boolean flag"),
            "{token}: {}",
            capture.err_text()
        );
        assert!(capture.out.is_empty());
    }
}

#[test]
fn flag_message() {
    let (mut parser, _) = flag_parser();
    let mut capture = Capture::new();

    let _ = parser.parse_with(&["-a=x"], &mut capture);

    assert_eq!(
        capture.err_text(),
        "usage: prog [-a]\nprog: error: argument -a/--arg: invalid value for boolean flag: \"x\"\n"
    );
}

#[test]
fn chained_short_flags() {
    let mut parser = Parser::new("prog");
    let a = parser
        .begin_optional(Tags::LongShort {
            long: "alpha",
            short: 'a',
        })
        .unwrap()
        .set_type_flag()
        .end();
    let b = parser
        .begin_optional(Tags::LongShort {
            long: "beta",
            short: 'b',
        })
        .unwrap()
        .set_type_flag()
        .end();

    let inputs: [&[&str]; 5] = [
        &["-ab"],
        &["-ba"],
        &["-a", "-b"],
        &["--alpha", "--beta"],
        &["-b", "--alpha"],
    ];

    for tokens in inputs {
        let mut capture = Capture::new();
        parser.parse_with(tokens, &mut capture).unwrap();
        assert!(a.get() && b.get(), "{tokens:?}");
    }

    let mut capture = Capture::new();
    parser.parse_with(&["-a"], &mut capture).unwrap();
    assert!(a.get());
    assert!(!b.get(), "reparsing starts from scratch");
}

#[test]
fn int_positional() {
    let mut parser = Parser::new("prog");
    let number = parser.begin_positional("number").unwrap().set_type_int().end();

    let mut capture = Capture::new();
    parser.parse_with(&["1"], &mut capture).unwrap();
    assert_eq!(number.get(), Some(1));

    let mut capture = Capture::new();
    parser.parse_with(&["-0x10"], &mut capture).unwrap_err();
    assert_eq!(
        capture.err_text(),
        "usage: prog number\nprog: error: unrecognized argument: -0x10\n"
    );

    let mut capture = Capture::new();
    assert!(matches!(
        parser.parse_with(&[""], &mut capture),
        Err(Error::Parse)
    ));
    assert_eq!(
        capture.err_text(),
        "usage: prog number\nprog: error: argument number: invalid value for integer argument: \"\"\n"
    );
    assert_eq!(number.get(), None);
}

#[test]
fn missing_positional() {
    let mut parser = Parser::new("prog");
    parser.begin_positional("number").unwrap().set_type_int().end();

    let mut capture = Capture::new();
    let tokens: [&str; 0] = [];
    parser.parse_with(&tokens, &mut capture).unwrap_err();

    assert_eq!(
        capture.err_text(),
        "usage: prog number\nprog: error: argument number: the argument is required\n"
    );
}

#[test]
fn too_many_positionals() {
    let mut parser = Parser::new("prog");
    parser.begin_positional("number").unwrap().set_type_int().end();

    let mut capture = Capture::new();
    parser.parse_with(&["1", "2"], &mut capture).unwrap_err();

    assert_eq!(
        capture.err_text(),
        "usage: prog number\nprog: error: unrecognized argument: 2\n"
    );
}

#[test]
fn enum_choices() {
    let mut parser = Parser::new("prog");
    let choice = parser
        .begin_optional(Tags::Short { short: 'e' })
        .unwrap()
        .set_type_enum(&["a", "bcd"])
        .end();

    assert_eq!(
        parser.arguments().next().unwrap().metavar(),
        "{a,bcd}"
    );

    let mut capture = Capture::new();
    parser.parse_with(&["-e", "bcd"], &mut capture).unwrap();
    assert_eq!(choice.get(), Some(1));

    let mut capture = Capture::new();
    parser.parse_with(&["-ea"], &mut capture).unwrap();
    assert_eq!(choice.get(), Some(0));

    let mut capture = Capture::new();
    parser.parse_with(&["-e", "b"], &mut capture).unwrap_err();
    assert_eq!(
        capture.err_text(),
        "usage: prog [-e {a,bcd}]\nprog: error: argument -e: invalid choice: \"b\" (choose from a, bcd)\n"
    );
}

#[test]
fn strings_borrow_from_the_tokens() {
    let mut parser = Parser::new("prog");
    let output = parser
        .begin_optional(Tags::LongShort {
            long: "output",
            short: 'o',
        })
        .unwrap()
        .set_type_string()
        .end();

    let inputs: [&[&str]; 4] = [
        &["-o", "file.txt"],
        &["-ofile.txt"],
        &["-o=file.txt"],
        &["--output=file.txt"],
    ];

    for tokens in inputs {
        let mut capture = Capture::new();
        parser.parse_with(tokens, &mut capture).unwrap();

        let span = output.get().unwrap();
        assert_eq!(span.to_str(tokens), Some("file.txt"), "{tokens:?}");
    }

    let tokens = ["--output", ""];
    let mut capture = Capture::new();
    parser.parse_with(&tokens, &mut capture).unwrap();
    assert_eq!(output.get().unwrap().to_str(&tokens), Some(""));
}

#[test]
fn option_values_can_look_like_dashes() {
    let mut parser = Parser::new("prog");
    let output = parser
        .begin_optional(Tags::Short { short: 'o' })
        .unwrap()
        .set_type_string()
        .end();

    let tokens = ["-o", "-"];
    let mut capture = Capture::new();
    parser.parse_with(&tokens, &mut capture).unwrap();
    assert_eq!(output.get().unwrap().to_str(&tokens), Some("-"));

    let mut capture = Capture::new();
    parser.parse_with(&["-o", "-x"], &mut capture).unwrap_err();
    assert_eq!(
        capture.err_text(),
        "usage: prog [-o O]\nprog: error: argument -o: expected an argument\n"
    );
}

#[test]
fn required_option() {
    let mut parser = Parser::new("prog");
    parser
        .begin_optional(Tags::Long { long: "name" })
        .unwrap()
        .required(true)
        .set_type_string()
        .end();

    let mut capture = Capture::new();
    let tokens: [&str; 0] = [];
    parser.parse_with(&tokens, &mut capture).unwrap_err();

    assert_eq!(
        capture.err_text(),
        "usage: prog --name NAME\nprog: error: argument --name: the argument is required\n"
    );
}

#[test]
fn syntax_errors() {
    let mut parser = Parser::new("prog");
    parser
        .begin_optional(Tags::LongShort {
            long: "help",
            short: 'h',
        })
        .unwrap()
        .set_type_help()
        .end();
    parser
        .begin_optional(Tags::Short { short: 'p' })
        .unwrap()
        .set_type_custom(Nargs::Exact(2), |_| Ok(()))
        .end();

    let mut capture = Capture::new();
    parser.parse_with(&["--help=yes"], &mut capture).unwrap_err();
    assert!(
        capture
            .err_text()
            .ends_with("prog: error: argument -h/--help: cannot parse '='\n")
    );

    let mut capture = Capture::new();
    parser.parse_with(&["-px"], &mut capture).unwrap_err();
    assert!(
        capture
            .err_text()
            .ends_with("prog: error: argument -p: expected new argument or '='\n")
    );

    let mut capture = Capture::new();
    parser.parse_with(&["-p", "1"], &mut capture).unwrap_err();
    assert!(
        capture
            .err_text()
            .ends_with("prog: error: argument -p: expected an argument\n")
    );

    let mut capture = Capture::new();
    parser.parse_with(&["-p", "1", "2"], &mut capture).unwrap();
}

#[test]
fn custom_values_and_errors() {
    let seen = Rc::new(Cell::new(0));
    let mut parser = Parser::new("prog");

    let counter = Rc::clone(&seen);
    parser
        .begin_optional(Tags::Long { long: "even" })
        .unwrap()
        .metavar("N")
        .set_type_custom(Nargs::OneOrMore, move |invocation| {
            let value = invocation.value().ok_or(ValueError::NeedArgument)?;

            match value.bytes().len() % 2 {
                0 => {
                    counter.set(counter.get() + 1);
                    invocation.request_more();
                    Ok(())
                }
                _ => Err(ValueError::custom("odd length")),
            }
        })
        .end();

    parser
        .begin_optional(Tags::Long { long: "stop" })
        .unwrap()
        .set_type_custom(Nargs::Exact(0), |_| Err(ValueError::Exit))
        .end();

    let mut capture = Capture::new();
    parser
        .parse_with(&["--even", "aa", "bbbb", "--even=cc"], &mut capture)
        .unwrap();
    assert_eq!(seen.get(), 3);

    let mut capture = Capture::new();
    parser.parse_with(&["--even", "aa", "b"], &mut capture).unwrap_err();
    assert_eq!(
        capture.err_text(),
        "usage: prog [--even N [N ...]] [--stop]\nprog: error: argument --even: odd length\n"
    );

    let mut capture = Capture::new();
    let status = parser
        .parse_with(&["--stop", "--even"], &mut capture)
        .unwrap();
    assert_eq!(status, Status::Exit);
    assert!(capture.err.is_empty());
}

#[test]
fn destructors_run_on_drop() {
    let dropped = Rc::new(Cell::new(false));

    let mut parser = Parser::new("prog");
    let flag = Rc::clone(&dropped);
    parser
        .begin_positional("thing")
        .unwrap()
        .destructor(move || flag.set(true))
        .set_type_string()
        .end();

    assert!(!dropped.get());
    drop(parser);
    assert!(dropped.get());
}

#[test]
fn reset_restores_a_fresh_tree() {
    let (mut parser, arg) = flag_parser();

    let mut capture = Capture::new();
    parser.parse_with(&["-a"], &mut capture).unwrap();
    assert!(arg.get());
    assert!(parser.arguments().all(|argument| argument.was_specified()));

    parser.reset();
    assert!(!arg.get());
    assert!(parser.arguments().all(|argument| !argument.was_specified()));

    let tokens: [&str; 0] = [];
    parser.parse_with(&tokens, &mut capture).unwrap();
    assert!(!arg.get());
}

#[test]
fn double_dash_is_a_positional_value() {
    let mut parser = Parser::new("prog");
    let value = parser.begin_positional("value").unwrap().set_type_string().end();

    let tokens = ["--"];
    let mut capture = Capture::new();
    parser.parse_with(&tokens, &mut capture).unwrap();
    assert_eq!(value.get().unwrap().to_str(&tokens), Some("--"));
}

#[test]
#[should_panic]
fn duplicate_names_are_rejected() {
    let mut parser = Parser::new("prog");
    let _ = parser
        .begin_optional(Tags::Short { short: 'x' })
        .unwrap()
        .set_type_flag()
        .end();
    let _ = parser
        .begin_optional(Tags::LongShort {
            long: "other",
            short: 'x',
        })
        .unwrap()
        .set_type_flag()
        .end();
}

#[test]
fn positionals_without_a_minimum_are_optional() {
    let mut parser = Parser::new("prog");
    parser
        .begin_positional("first")
        .unwrap()
        .set_type_custom(Nargs::ZeroOrOne, |_| Ok(()))
        .end();
    parser
        .begin_positional("rest")
        .unwrap()
        .set_type_custom(Nargs::ZeroOrMore, |_| Ok(()))
        .end();

    let mut capture = Capture::new();
    parser.show_usage(&mut capture).unwrap();
    assert_eq!(
        capture.out_text(),
        "usage: prog [first] [rest [rest ...]]\n"
    );

    let mut capture = Capture::new();
    let tokens: [&str; 0] = [];
    assert_eq!(
        parser.parse_with(&tokens, &mut capture).unwrap(),
        Status::Complete
    );
    assert!(capture.err.is_empty());
    assert!(parser.arguments().all(|argument| !argument.is_required()));
}

#[test]
fn explicitly_required_variadic_positional() {
    let mut parser = Parser::new("prog");
    parser
        .begin_positional("rest")
        .unwrap()
        .required(true)
        .set_type_custom(Nargs::ZeroOrMore, |_| Ok(()))
        .end();

    let mut capture = Capture::new();
    let tokens: [&str; 0] = [];
    parser.parse_with(&tokens, &mut capture).unwrap_err();
    assert_eq!(
        capture.err_text(),
        "usage: prog [rest [rest ...]]\nprog: error: argument rest: the argument is required\n"
    );

    let mut capture = Capture::new();
    parser.parse_with(&["a"], &mut capture).unwrap();
}
