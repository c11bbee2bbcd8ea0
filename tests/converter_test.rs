use std::fs;
use std::path::Path;
use svg2kicadmod::{
    ConvertError, ConvertOptions, FootprintOptions, HorizontalAlign, Point, TraverseOptions,
    VerticalAlign, bounding_box, convert_file, convert_shapes, convert_svg,
};

/// Split footprint text into tokens, dropping whitespace and parentheses
fn tokens(s: &str) -> Vec<&str> {
    s.split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .filter(|t| !t.is_empty())
        .collect()
}

/// Compare two footprints token by token, numbers within 1e-5
fn footprint_equal(a: &str, b: &str) -> bool {
    let ta = tokens(a);
    let tb = tokens(b);
    if ta.len() != tb.len() {
        return false;
    }
    ta.iter().zip(tb.iter()).all(|(x, y)| {
        match (x.parse::<f64>(), y.parse::<f64>()) {
            (Ok(nx), Ok(ny)) => (nx - ny).abs() < 1e-5,
            _ => x == y,
        }
    })
}

fn run_conversion_test(name: &str, options: &ConvertOptions) {
    let artifacts_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/artifacts");
    let svg_path = artifacts_dir.join(format!("{}.svg", name));
    let expected_path = artifacts_dir.join(format!("{}.kicad_mod", name));

    let expected = fs::read_to_string(&expected_path)
        .unwrap_or_else(|_| panic!("Failed to read {}.kicad_mod", name));

    let temp_dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join("converter_test");
    let _ = fs::create_dir_all(&temp_dir);
    let output_path = temp_dir.join(format!("{}.kicad_mod", name));

    convert_file(&svg_path, &output_path, options)
        .unwrap_or_else(|e| panic!("Failed to convert {}.svg: {}", name, e));
    let generated = fs::read_to_string(&output_path).unwrap();

    assert!(
        footprint_equal(&generated, &expected),
        "Footprint mismatch for {}\n\nGenerated:\n{}\n\nExpected:\n{}",
        name,
        generated,
        expected
    );
}

#[test]
fn test_line() {
    run_conversion_test("line", &ConvertOptions::default());
}

#[test]
fn test_line_exact_text() {
    let artifacts_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/artifacts");
    let svg = fs::read_to_string(artifacts_dir.join("line.svg")).unwrap();
    let expected = fs::read_to_string(artifacts_dir.join("line.kicad_mod")).unwrap();
    assert_eq!(convert_svg(&svg, &ConvertOptions::default()).unwrap(), expected);
}

#[test]
fn test_nested_groups_with_view_box() {
    let options = ConvertOptions {
        target_width: 10.0,
        ..Default::default()
    };
    run_conversion_test("nested", &options);
}

#[test]
fn test_wrapped_polylines_and_subpaths() {
    let options = ConvertOptions {
        footprint: FootprintOptions {
            name: "Wiggle".to_string(),
            layer: "B.SilkS".to_string(),
            line_width: 0.15,
        },
        ..Default::default()
    };
    run_conversion_test("polyline", &options);
}

#[test]
fn test_translated_line_shapes() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <g transform="translate(5,5)"><path d="M0,0 L10,0"/></g>
</svg>"#;
    let options = ConvertOptions {
        horizontal_align: HorizontalAlign::Left,
        vertical_align: VerticalAlign::Top,
        ..Default::default()
    };
    let shapes = convert_shapes(svg, &options).unwrap();
    assert_eq!(shapes.len(), 1);
    assert!(!shapes[0].filled);
    assert_eq!(
        shapes[0].points,
        vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]
    );
}

#[test]
fn test_unit_mismatch_writes_nothing() {
    let svg = r#"<svg width="10mm" height="10in"><path d="M0,0 L1,1"/></svg>"#;
    let temp_dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join("converter_test");
    let _ = fs::create_dir_all(&temp_dir);
    let input = temp_dir.join("mismatch.svg");
    let output = temp_dir.join("mismatch.kicad_mod");
    fs::write(&input, svg).unwrap();
    let _ = fs::remove_file(&output);

    let err = convert_file(&input, &output, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::UnitMismatch { .. }));
    assert!(!output.exists());
}

#[test]
fn test_circle_is_flattened_within_tolerance() {
    let svg = r#"<svg width="100" height="100">
  <path d="M 60,50 A 10,10 0 1 1 40,50 A 10,10 0 1 1 60,50 Z" style="fill:#000000"/>
</svg>"#;
    let shapes = convert_shapes(svg, &ConvertOptions::default()).unwrap();
    assert_eq!(shapes.len(), 1);
    assert!(shapes[0].filled);

    let points = &shapes[0].points;
    assert!(points.len() > 8);
    let origin = Point::new(0.0, 0.0);
    for p in points {
        assert!((p.distance(origin) - 10.0).abs() < 0.05, "{:?} off circle", p);
    }

    let bounds = bounding_box(&shapes).unwrap();
    assert!((bounds.width() - 20.0).abs() < 0.2);
    assert!((bounds.height() - 20.0).abs() < 0.2);
}

#[test]
fn test_fill_comes_from_style_only() {
    let svg = r#"<svg>
  <path fill="black" d="M0,0 L10,0"/>
  <path style="stroke:#000;fill:#ff0000" d="M0,5 L10,5"/>
  <path style="fill:none" fill="black" d="M0,9 L10,9"/>
</svg>"#;
    let shapes = convert_shapes(svg, &ConvertOptions::default()).unwrap();
    let filled: Vec<bool> = shapes.iter().map(|s| s.filled).collect();
    assert_eq!(filled, vec![false, true, false]);
}

#[test]
fn test_straight_paths_at_zero_tolerance() {
    let svg = r#"<svg>
  <path d="M0.1,0.7 L0.3,0.9 C 0.3,0.9 1.3,0.9 1.3,0.9"/>
</svg>"#;
    let options = ConvertOptions {
        traverse: TraverseOptions {
            tolerance: 0.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let shapes = convert_shapes(svg, &options).unwrap();
    assert_eq!(shapes[0].points.len(), 3);
}

#[test]
fn test_tighter_tolerance_adds_points() {
    let svg = r#"<svg><path d="M0,0 C 0,40 40,40 40,0"/></svg>"#;
    let coarse = ConvertOptions {
        traverse: TraverseOptions {
            tolerance: 10.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let fine = ConvertOptions {
        traverse: TraverseOptions {
            tolerance: 0.01,
            ..Default::default()
        },
        ..Default::default()
    };
    let coarse_shapes = convert_shapes(svg, &coarse).unwrap();
    let fine_shapes = convert_shapes(svg, &fine).unwrap();
    assert!(fine_shapes[0].points.len() > coarse_shapes[0].points.len());
}

#[test]
fn test_hidden_paths_policy() {
    let svg = r#"<svg>
  <g style="display:inline" visibility="hidden">
    <path d="M0,0 L10,0"/>
    <path visibility="visible" d="M0,5 L10,5"/>
  </g>
  <path d="M0,10 L10,10"/>
</svg>"#;

    let all = convert_shapes(svg, &ConvertOptions::default()).unwrap();
    assert_eq!(all.len(), 3);

    let options = ConvertOptions {
        traverse: TraverseOptions {
            skip_hidden: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let visible = convert_shapes(svg, &options).unwrap();
    assert_eq!(visible.len(), 2);
}

#[test]
fn test_no_paths_is_empty_input() {
    let svg = r#"<svg><defs/><text>label</text></svg>"#;
    let err = convert_svg(svg, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::EmptyInput));
}

#[test]
fn test_malformed_documents() {
    let bad_xml = convert_svg("<svg><g></svg>", &ConvertOptions::default()).unwrap_err();
    assert!(matches!(bad_xml, ConvertError::Xml(_)));

    let bad_transform = convert_svg(
        r#"<svg><path transform="translate(1," d="M0,0 L1,1"/></svg>"#,
        &ConvertOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(bad_transform, ConvertError::Parse { .. }));
}
