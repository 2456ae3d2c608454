use command_spec_core::{
    ArgumentDescriptor, Command, CommandError, CommandSpec, FlagSet, FlagValue, FromFlags,
    NormalizedFlags, ParseError, ParsedResult, ParserInput, command_flags, flag,
    normalize_result, normalize_spec, parse,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

fn mixed_flags() -> FlagSet {
    FlagSet::new()
        .with("help", flag::boolean().short('h'))
        .with("verbose", flag::boolean().short('v'))
        .with("Version", flag::boolean().short('V'))
        .with("name", flag::string().short('n'))
        .with("output", flag::string())
}

fn spec_with(flags: FlagSet) -> CommandSpec {
    CommandSpec::new("test").with_flags(flags)
}

// ---------------------------------------------------------------------------
// Flag coercion
// ---------------------------------------------------------------------------

#[test]
fn test_boolean_present_and_absent() {
    let spec = spec_with(mixed_flags());

    for name in ["help", "verbose", "Version"] {
        let output = parse(&spec, &argv(&[&format!("--{name}")]), None).unwrap();
        assert_eq!(output.flags.get(name), Some(&FlagValue::Bool(true)));

        let output = parse(&spec, &argv(&[]), None).unwrap();
        assert_eq!(output.flags.get(name), None);
    }
}

#[test]
fn test_string_takes_value() {
    let spec = spec_with(mixed_flags());

    for name in ["name", "output"] {
        let output = parse(&spec, &argv(&[&format!("--{name}"), "value"]), None).unwrap();
        assert_eq!(output.flags.string(name), Some("value"));
    }
}

#[test]
fn test_short_equals_long() {
    let spec = spec_with(mixed_flags());

    for (short, long) in [("-h", "--help"), ("-v", "--verbose"), ("-V", "--Version")] {
        let by_short = parse(&spec, &argv(&[short]), None).unwrap();
        let by_long = parse(&spec, &argv(&[long]), None).unwrap();
        assert_eq!(by_short.flags, by_long.flags);
    }

    let by_short = parse(&spec, &argv(&["-n", "x"]), None).unwrap();
    let by_long = parse(&spec, &argv(&["--name", "x"]), None).unwrap();
    assert_eq!(by_short.flags, by_long.flags);
}

// ---------------------------------------------------------------------------
// Normalizer round trip
// ---------------------------------------------------------------------------

#[test]
fn test_result_keys_are_logical_names() {
    let flags = mixed_flags();
    let output = parse(
        &spec_with(flags.clone()),
        &argv(&["-h", "-v", "-V", "-n", "a", "--output", "b"]),
        None,
    )
    .unwrap();

    assert_eq!(
        output.flags.names().collect::<Vec<_>>(),
        flags.names().collect::<Vec<_>>()
    );
    assert!(output.flags.names().all(|name| !name.starts_with('-')));
}

#[test]
fn test_normalize_result_inverts_prefixing() {
    let flags = mixed_flags();
    let token_spec = normalize_spec(&flags);

    let mut raw = ParsedResult::default();
    for (token, _) in token_spec.iter().filter(|(t, _)| t.starts_with("--")) {
        raw.values.insert(token.to_string(), FlagValue::Bool(true));
    }

    let normalized = normalize_result(&raw);
    assert_eq!(
        normalized.names().collect::<Vec<_>>(),
        flags.names().collect::<Vec<_>>()
    );
}

#[test]
fn test_parse_is_idempotent() {
    let spec = spec_with(mixed_flags());
    let tokens = argv(&["-hv", "--name=x", "--stray", "pos"]);

    let first = parse(&spec, &tokens, None).unwrap();
    let second = parse(&spec, &tokens, None).unwrap();
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Permissive parsing
// ---------------------------------------------------------------------------

#[test]
fn test_unrecognized_tokens_are_ignored() {
    let spec = spec_with(FlagSet::new().with("help", flag::boolean().short('h')));
    let output = parse(&spec, &argv(&["--unknown", "x", "-h"]), None).unwrap();

    let expected: NormalizedFlags = [("help", FlagValue::Bool(true))].into_iter().collect();
    assert_eq!(output.flags, expected);
    assert!(!output.flags.contains("unknown"));
}

#[test]
fn test_empty_spec_ignores_everything() {
    let output = parse(&CommandSpec::new("empty"), &argv(&["-abc", "--x=y", "z"]), None).unwrap();

    assert!(output.flags.is_empty());
    assert_eq!(output.argv, argv(&["z"]));
}

// ---------------------------------------------------------------------------
// Default specification via the Command trait
// ---------------------------------------------------------------------------

command_flags! {
    struct TestFlags {
        help: boolean(short('h')),
    }
}

struct Test {
    spec: CommandSpec,
    seen_help: bool,
}

impl Test {
    fn new() -> Self {
        Self {
            spec: CommandSpec::new("test")
                .with_flags(TestFlags::descriptors())
                .with_arg(ArgumentDescriptor::new("toto")),
            seen_help: false,
        }
    }
}

impl Command for Test {
    fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    fn run(&mut self, argv: &[String]) -> Result<Option<String>, CommandError> {
        let flags: TestFlags = self.parse(argv, None)?.typed();
        self.seen_help = flags.help == Some(true);
        Ok(None)
    }
}

#[test]
fn test_default_specification() {
    let cmd = Test::new();
    let output = cmd.parse(&argv(&["-h"]), None).unwrap();

    let expected: NormalizedFlags = [("help", FlagValue::Bool(true))].into_iter().collect();
    assert_eq!(output.flags, expected);
}

#[test]
fn test_run_reads_typed_flags() {
    let mut cmd = Test::new();
    cmd.run(&argv(&["-h"])).unwrap();
    assert!(cmd.seen_help);

    cmd.run(&argv(&["toto-value"])).unwrap();
    assert!(!cmd.seen_help);
}

#[test]
fn test_parse_flags_uses_typed_descriptors() {
    let cmd = Test::new();
    let flags: TestFlags = cmd.parse_flags(&argv(&["--help"])).unwrap();

    assert_eq!(flags, TestFlags { help: Some(true) });
}

#[test]
fn test_run_propagates_parse_error() {
    struct Strict(CommandSpec);

    impl Command for Strict {
        fn spec(&self) -> &CommandSpec {
            &self.0
        }

        fn run(&mut self, argv: &[String]) -> Result<Option<String>, CommandError> {
            self.parse(argv, None)?;
            Ok(None)
        }
    }

    let mut cmd = Strict(CommandSpec::new("strict").with_arg(ArgumentDescriptor::new("file").required()));
    let err = cmd.run(&argv(&[])).unwrap_err();

    assert!(matches!(
        err,
        CommandError::Parse(ParseError::MissingArgument(ref name)) if name == "file"
    ));
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

#[test]
fn test_override_args_and_double_dash() {
    let input = ParserInput {
        args: Some(vec![
            ArgumentDescriptor::new("first"),
            ArgumentDescriptor::new("second"),
        ]),
        double_dash: Some(true),
        context: Some("root test".to_string()),
        ..Default::default()
    };

    let output = Test::new()
        .parse(&argv(&["a", "--", "-h"]), Some(&input))
        .unwrap();

    assert_eq!(output.args.get("first"), Some("a"));
    assert_eq!(output.args.get("second"), Some("-h"));
    assert!(output.flags.is_empty());
}

#[test]
fn test_double_dash_disabled_is_a_positional_value() {
    let spec = CommandSpec::new("test").with_arg(ArgumentDescriptor::new("first"));
    let input = ParserInput {
        double_dash: Some(false),
        ..Default::default()
    };

    let output = parse(&spec, &argv(&["--"]), Some(&input)).unwrap();

    assert_eq!(output.args.get("first"), Some("--"));
    assert_eq!(output.argv, argv(&["--"]));
}

#[test]
fn test_double_dash_disabled_is_a_string_value() {
    let spec = spec_with(FlagSet::new().with("name", flag::string()));
    let input = ParserInput {
        double_dash: Some(false),
        ..Default::default()
    };

    let output = parse(&spec, &argv(&["--name", "--"]), Some(&input)).unwrap();
    assert_eq!(output.flags.string("name"), Some("--"));

    assert_eq!(
        parse(&spec, &argv(&["--name", "--"]), None),
        Err(ParseError::MissingValue("--name".to_string()))
    );
}

#[test]
fn test_output_serializes_as_json() {
    let output = Test::new().parse(&argv(&["-h", "x"]), None).unwrap();

    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        serde_json::json!({
            "flags": {"help": true},
            "args": {"toto": "x"},
            "argv": ["x"],
        })
    );
}
