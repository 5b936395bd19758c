#![forbid(unsafe_code)]

//! End-to-end rendering of small fixed frames, compared as exact text.

use af_display::{DisplayOptions, RenderMode, SummaryLimit};
use af_frame::{DataFrame, Selector};
use af_types::{DType, Scalar};
use chrono::{FixedOffset, NaiveDate, TimeZone};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn mixed() -> DataFrame {
    DataFrame::from_columns(vec![
        ("integer", (1..=6).map(Scalar::from).collect()),
        (
            "double",
            vec![
                Scalar::Float64(1.0),
                Scalar::Float64(f64::NAN),
                Scalar::Float64(f64::INFINITY),
                Scalar::Float64(f64::NEG_INFINITY),
                Scalar::Null,
                Scalar::Float64(0.0),
            ],
        ),
        (
            "string",
            ["A", "A", "B", "C", "D", "E"].into_iter().map(Scalar::from).collect(),
        ),
        (
            "boolean",
            vec![
                Scalar::Bool(true),
                Scalar::Bool(false),
                Scalar::Null,
                Scalar::Bool(true),
                Scalar::Bool(false),
                Scalar::Null,
            ],
        ),
    ])
    .expect("mixed frame")
}

fn date(y: i32, m: u32, d: u32) -> Scalar {
    Scalar::from(NaiveDate::from_ymd_opt(y, m, d).expect("valid date"))
}

fn penguins() -> DataFrame {
    let schema = vec![
        ("ID".to_owned(), DType::Utf8),
        ("Date Egg".to_owned(), DType::Date32),
        ("Culmen_Length_mm".to_owned(), DType::Double),
        ("Culmen_Depth_mm".to_owned(), DType::Double),
        ("Flipper_Length_mm".to_owned(), DType::Int64),
        ("Body_Mass_g".to_owned(), DType::Int64),
        ("Sex".to_owned(), DType::Utf8),
    ];
    let row = |id: &str, egg: Scalar, length: f64, depth: f64, flipper: i64, mass: i64, sex: &str| {
        vec![
            Scalar::from(id),
            egg,
            Scalar::from(length),
            Scalar::from(depth),
            Scalar::from(flipper),
            Scalar::from(mass),
            Scalar::from(sex),
        ]
    };
    let rows = vec![
        row("N1A1", date(2007, 11, 11), 39.1, 18.7, 181, 3750, "MALE"),
        row("N1A2", date(2007, 11, 11), 39.5, 17.4, 186, 3800, "FEMALE"),
        row("N2A1", date(2007, 11, 16), 40.3, 18.0, 195, 3250, "FEMALE"),
        vec![
            Scalar::from("N2A2"),
            date(2007, 11, 16),
            Scalar::Null,
            Scalar::Null,
            Scalar::Null,
            Scalar::Null,
            Scalar::from(""),
        ],
        row("N3A1", date(2007, 11, 16), 36.7, 19.3, 193, 3450, "FEMALE"),
        row("N3A2", date(2007, 11, 16), 39.3, 20.6, 190, 3650, "MALE"),
        row("N4A1", date(2007, 11, 15), 38.9, 17.8, 181, 3625, "FEMALE"),
        row("N4A2", date(2007, 11, 15), 39.2, 19.6, 195, 4675, "MALE"),
        row("N5A1", date(2007, 11, 9), 34.1, 18.1, 193, 3475, ""),
        row("N5A2", date(2007, 11, 9), 42.0, 20.2, 190, 4250, ""),
    ];
    DataFrame::from_rows_with_schema(schema, rows).expect("penguins frame")
}

fn table(frame: &DataFrame) -> String {
    frame.render_with(RenderMode::Table, &DisplayOptions::default())
}

#[test]
fn mixed_frame_as_table() {
    init_logging();
    let expected = "\
DataFrame : 6 x 4 Vectors
  integer    double string   boolean
  <uint8>  <double> <string> <boolean>
0       1       1.0 A        true
1       2       NaN A        false
2       3  Infinity B        (nil)
3       4 -Infinity C        true
4       5     (nil) D        false
5       6       0.0 E        (nil)
";
    assert_eq!(table(&mixed()), expected);
}

#[test]
fn mixed_frame_as_summary() {
    init_logging();
    let expected = "\
DataFrame : 6 x 4 Vectors
Vectors : 2 numeric, 1 string, 1 boolean
# key      type    level data_preview
0 :integer uint8       6 [1, 2, 3, 4, 5, ... ]
1 :double  double      6 [1.0, NaN, Infinity, -Infinity, nil, ... ], 1 NaN, 1 nil
2 :string  string      5 {\"A\"=>2, \"B\"=>1, \"C\"=>1, \"D\"=>1, \"E\"=>1}
3 :boolean boolean     3 {true=>2, false=>2, nil=>2}
";
    assert_eq!(
        mixed().render_with(RenderMode::Summary, &DisplayOptions::default()),
        expected
    );
    assert_eq!(mixed().render_summary(SummaryLimit::All, 5, 5), expected);
}

#[test]
fn inspect_summary_lists_three_columns() {
    let expected = "\
DataFrame : 6 x 4 Vectors
Vectors : 2 numeric, 1 string, 1 boolean
# key      type    level data_preview
0 :integer uint8       6 [1, 2, 3, 4, 5, ... ]
1 :double  double      6 [1.0, NaN, Infinity, -Infinity, nil, ... ], 1 NaN, 1 nil
2 :string  string      5 {\"A\"=>2, \"B\"=>1, \"C\"=>1, \"D\"=>1, \"E\"=>1}
 ... 1 more Vector ...
";
    assert_eq!(
        mixed().render_with(RenderMode::Summary, &DisplayOptions::inspect()),
        expected
    );
}

#[test]
fn summary_limit_and_thresholds() {
    let frame = mixed();
    let limited = frame.render_summary(SummaryLimit::Count(2), 5, 5);
    assert!(limited.contains("\n# key      type    level data_preview\n"));
    assert!(limited.ends_with(
        "1 :double  double      6 [1.0, NaN, Infinity, -Infinity, nil, ... ], 1 NaN, 1 nil\n ... 2 more Vectors ...\n"
    ));

    let low_tally = frame.render_summary(SummaryLimit::All, 2, 5);
    assert!(low_tally.contains("2 :string  string      5 [\"A\", \"A\", \"B\", \"C\", \"D\", ... ]\n"));
    assert!(low_tally.contains("3 :boolean boolean     3 [true, false, nil, true, false, ... ], 2 nils\n"));

    let all_elements = frame.render_summary(SummaryLimit::All, 2, 6);
    assert!(all_elements.contains("0 :integer uint8       6 [1, 2, 3, 4, 5, 6]\n"));
    assert!(all_elements.contains(
        "1 :double  double      6 [1.0, NaN, Infinity, -Infinity, nil, 0.0], 1 NaN, 1 nil\n"
    ));
    assert!(all_elements.contains("2 :string  string      5 [\"A\", \"A\", \"B\", \"C\", \"D\", \"E\"]\n"));
}

#[test]
fn minimal_mode_is_header_only() {
    assert_eq!(
        mixed().render_with(RenderMode::Minimal, &DisplayOptions::default()),
        "DataFrame : 6 x 4 Vectors"
    );
}

#[test]
fn penguins_elide_rows_and_columns() {
    init_logging();
    let expected = "\
DataFrame : 10 x 7 Vectors
  ID       Date Egg   Culmen_Length_mm Culmen_Depth_mm Flipper_Length_mm ... Sex
  <string> <date32>           <double>        <double>           <int64> ... <string>
0 N1A1     2007-11-11             39.1            18.7               181 ... MALE
1 N1A2     2007-11-11             39.5            17.4               186 ... FEMALE
2 N2A1     2007-11-16             40.3            18.0               195 ... FEMALE
3 N2A2     2007-11-16            (nil)           (nil)             (nil) ...
4 N3A1     2007-11-16             36.7            19.3               193 ... FEMALE
: :        :                         :               :                 : ... :
7 N4A2     2007-11-15             39.2            19.6               195 ... MALE
8 N5A1     2007-11-09             34.1            18.1               193 ...
9 N5A2     2007-11-09             42.0            20.2               190 ...
";
    assert_eq!(table(&penguins()), expected);
}

#[test]
fn penguins_without_date_fit_the_width() {
    let frame = penguins()
        .select_columns(&[
            "ID",
            "Culmen_Length_mm",
            "Culmen_Depth_mm",
            "Flipper_Length_mm",
            "Body_Mass_g",
            "Sex",
        ])
        .expect("columns");
    let expected = "\
DataFrame : 10 x 6 Vectors
  ID       Culmen_Length_mm Culmen_Depth_mm Flipper_Length_mm Body_Mass_g Sex
  <string>         <double>        <double>           <int64>     <int64> <string>
0 N1A1                 39.1            18.7               181        3750 MALE
1 N1A2                 39.5            17.4               186        3800 FEMALE
2 N2A1                 40.3            18.0               195        3250 FEMALE
3 N2A2                (nil)           (nil)             (nil)       (nil)
4 N3A1                 36.7            19.3               193        3450 FEMALE
: :                       :               :                 :           : :
7 N4A2                 39.2            19.6               195        4675 MALE
8 N5A1                 34.1            18.1               193        3475
9 N5A2                 42.0            20.2               190        4250
";
    assert_eq!(table(&frame), expected);
}

#[test]
fn penguin_head_elides_columns_only() {
    let frame = penguins().select(&[Selector::from(0..=5)]).expect("rows");
    let expected = "\
DataFrame : 6 x 7 Vectors
  ID       Date Egg   Culmen_Length_mm Culmen_Depth_mm Flipper_Length_mm ... Sex
  <string> <date32>           <double>        <double>           <int64> ... <string>
0 N1A1     2007-11-11             39.1            18.7               181 ... MALE
1 N1A2     2007-11-11             39.5            17.4               186 ... FEMALE
2 N2A1     2007-11-16             40.3            18.0               195 ... FEMALE
3 N2A2     2007-11-16            (nil)           (nil)             (nil) ...
4 N3A1     2007-11-16             36.7            19.3               193 ... FEMALE
5 N3A2     2007-11-16             39.3            20.6               190 ... MALE
";
    assert_eq!(table(&frame), expected);
}

#[test]
fn blank_key_renders_as_unnamed() {
    let frame = DataFrame::from_columns(vec![
        ("", (1..=3).map(Scalar::from).collect()),
        ("x", ["A", "B", "C"].into_iter().map(Scalar::from).collect()),
    ])
    .expect("frame");
    let expected = "\
DataFrame : 3 x 2 Vectors
  unnamed1 x
   <uint8> <string>
0        1 A
1        2 B
2        3 C
";
    assert_eq!(table(&frame), expected);
}

#[test]
fn timestamps_preview_unquoted() {
    let offset = FixedOffset::east_opt(9 * 3600).expect("offset");
    let at = |h, m, s| {
        Scalar::from(
            offset
                .with_ymd_and_hms(2022, 6, 3, h, m, s)
                .single()
                .expect("timestamp"),
        )
    };
    let frame = DataFrame::from_rows_with_schema(
        vec![
            ("index".to_owned(), DType::Int64),
            ("value".to_owned(), DType::Double),
            ("datetime".to_owned(), DType::Timestamp),
        ],
        vec![
            vec![1.into(), 0.674_585_490_028_845_6.into(), at(19, 11, 16)],
            vec![2.into(), 0.132_213_176_346_407_72.into(), at(19, 15, 35)],
            vec![3.into(), 0.213_277_356_971_631_86.into(), at(19, 20, 5)],
        ],
    )
    .expect("frame");
    let text = frame.render_summary(SummaryLimit::All, 5, 2);
    let expected_head = "\
DataFrame : 3 x 3 Vectors
Vectors : 2 numeric, 1 temporal
# key       type      level data_preview
0 :index    int64         3 [1, 2, ... ]
1 :value    double        3 [0.6745854900288456, 0.13221317634640772, ... ]
2 :datetime timestamp     3 [2022-06-03 19:11:16 +0900, 2022-06-03 19:15:35 +0900, ... ]
";
    assert_eq!(text, expected_head);
}

#[test]
fn display_pairs_by_mode() {
    let frame = DataFrame::from_columns(vec![
        ("x", vec![1.0.into(), 2.0.into(), f64::NAN.into()]),
        ("y", vec!["".into(), " ".into(), Scalar::Null]),
        ("z", vec![true.into(), false.into(), Scalar::Null]),
    ])
    .expect("frame");

    let (mime, text) = frame.to_display_pair_with(RenderMode::Table);
    assert_eq!(mime, "text/plain");
    assert_eq!(
        text,
        "\
DataFrame : 3 x 3 Vectors
         x y        z
  <double> <string> <boolean>
0      1.0          true
1      2.0          false
2      NaN (nil)    (nil)
"
    );

    let (mime, html) = frame.to_display_pair_with(RenderMode::Html);
    assert_eq!(mime, "text/html");
    assert_eq!(
        html,
        "DataFrame <3 x 3 vectors> <table><tr><th>x</th><th>y</th><th>z</th></tr><tr><td>1</td><td>\"\"</td><td><i>(true)</i></td></tr><tr><td>2</td><td>\" \"</td><td><i>(false)</i></td></tr><tr><td>NaN</td><td><i>(nil)</i></td><td><i>(nil)</i></td></tr></table>"
    );

    assert_eq!(
        DataFrame::empty().to_display_pair_with(RenderMode::Html),
        ("text/plain", "(empty DataFrame)".to_owned())
    );
}

#[test]
fn json_options_shrink_the_table() {
    let options =
        DisplayOptions::from_json_str(r#"{"table": {"head": 2, "tail": 1}}"#).expect("options");
    let frame = DataFrame::from_columns(vec![("x", (1..=10).map(Scalar::from).collect())])
        .expect("frame");
    let expected = "\
DataFrame : 10 x 1 Vector
        x
  <uint8>
0       1
1       2
:       :
9      10
";
    assert_eq!(frame.render_with(RenderMode::Table, &options), expected);
}

#[test]
fn display_trait_uses_default_mode() {
    let frame = mixed();
    assert_eq!(frame.to_string(), frame.render());
}
