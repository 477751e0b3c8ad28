use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;
use wordflow::engine::{
    Cli, load_source, print_top_words, rank, rank_words, resolve_opts, tally_words, tokenize,
    write_record,
};
use wordflow::engine::progress::{create_counter, progress_callback};
use wordflow::utils::wordflow_toml::parse_wordflow_toml;
use wordflow::utils::{apply_env_with, apply_file_to_opts};
use wordflow::{CounterKind, FrequencyRecord, Opts, OutputFormat, Word, top_words};

fn words(s: &str) -> Vec<String> {
    tokenize(s.as_bytes()).map(|w| w.as_str().to_string()).collect()
}

fn rec(word: &str, count: usize) -> FrequencyRecord {
    FrequencyRecord {
        word: Word::new(word).unwrap(),
        count,
    }
}

fn pairs(records: &[FrequencyRecord]) -> Vec<(String, usize)> {
    records
        .iter()
        .map(|r| (r.word.as_str().to_string(), r.count))
        .collect()
}

/// Reference split: non-letters are separators, letters lowercased.
fn naive_split(buf: &[u8]) -> Vec<String> {
    buf.split(|b| !b.is_ascii_alphabetic())
        .filter(|run| !run.is_empty())
        .map(|run| String::from_utf8(run.to_ascii_lowercase()).unwrap())
        .collect()
}

/// Unique scratch dir under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("wordflow-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Cloneable writer so a test can read what the sink stage wrote.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

// --- tokenize ---

#[test]
fn test_tokenize_lowercases_and_splits() {
    assert_eq!(words("Hello, WORLD! it's"), vec!["hello", "world", "it", "s"]);
}

#[test]
fn test_tokenize_trailing_word_emitted() {
    assert_eq!(words("call me ishmael"), vec!["call", "me", "ishmael"]);
}

#[test]
fn test_tokenize_empty_and_separator_only() {
    assert!(words("").is_empty());
    assert!(words("  123 -- ,,, \n\t").is_empty());
}

#[test]
fn test_tokenize_digits_and_non_ascii_are_separators() {
    assert_eq!(words("abc1def"), vec!["abc", "def"]);
    // 'é' is two non-ASCII bytes.
    assert_eq!(words("café au lait"), vec!["caf", "au", "lait"]);
}

#[test]
fn test_tokenize_matches_naive_split() {
    let inputs: [&[u8]; 5] = [
        b"The quick brown Fox -- jumps over the lazy DOG.",
        b"\x00\xffab\x80CD ef\r\ngh",
        b"a",
        b"...x...y...",
        b"Moby-Dick; or, The Whale. CHAPTER 1. Loomings.",
    ];
    for input in inputs {
        let got: Vec<String> = tokenize(input).map(|w| w.as_str().to_string()).collect();
        assert_eq!(got, naive_split(input));
    }
}

// --- Word ---

#[test]
fn test_word_new_validates() {
    assert_eq!(Word::new("Whale").unwrap().as_str(), "whale");
    assert!(Word::new("").is_none());
    assert!(Word::new("two words").is_none());
    assert!(Word::new("r2d2").is_none());
}

// --- tally / rank ---

#[test]
fn test_tally_scenario_counts_and_order() {
    let top = tally_words(tokenize(b"aa bb aa cc bb aa"), CounterKind::Linear, 20);
    assert_eq!(
        pairs(&top),
        vec![("aa".into(), 3), ("bb".into(), 2), ("cc".into(), 1)]
    );
}

#[test]
fn test_tally_empty_input() {
    assert!(tally_words(tokenize(b""), CounterKind::Linear, 20).is_empty());
}

#[test]
fn test_tally_25_distinct_keeps_first_20_seen() {
    let text: String = (0..25)
        .map(|i| {
            let a = (b'a' + (i / 5) as u8) as char;
            let b = (b'a' + (i % 5) as u8) as char;
            format!("{a}{b} ")
        })
        .collect();
    let top = tally_words(tokenize(text.as_bytes()), CounterKind::Linear, 20);
    assert_eq!(top.len(), 20);
    assert!(top.iter().all(|r| r.count == 1));
    let expected: Vec<String> = words(&text).into_iter().take(20).collect();
    let got: Vec<String> = top.iter().map(|r| r.word.as_str().to_string()).collect();
    assert_eq!(got, expected);
}

#[test]
fn test_tally_counts_match_true_counts() {
    let text = "the whale the sea the ship a whale a sea of whales The SEA";
    let mut truth: HashMap<String, usize> = HashMap::new();
    for w in naive_split(text.as_bytes()) {
        *truth.entry(w).or_default() += 1;
    }
    let top = tally_words(tokenize(text.as_bytes()), CounterKind::Linear, 100);
    assert_eq!(top.len(), truth.len());
    for r in &top {
        assert_eq!(truth[r.word.as_str()], r.count, "count for {}", r.word);
    }
    assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
}

#[test]
fn test_indexed_counter_agrees_with_linear() {
    let text = b"one two three two three three four four four four five x y z x y x";
    for top_n in [0, 1, 3, 20] {
        let linear = tally_words(tokenize(text), CounterKind::Linear, top_n);
        let indexed = tally_words(tokenize(text), CounterKind::Indexed, top_n);
        assert_eq!(linear, indexed, "top_n {top_n}");
    }
}

#[test]
fn test_rank_stable_on_ties_and_truncates() {
    let ranked = rank(
        vec![rec("b", 1), rec("a", 2), rec("c", 1), rec("d", 2)],
        3,
    );
    assert_eq!(
        pairs(&ranked),
        vec![("a".into(), 2), ("d".into(), 2), ("b".into(), 1)]
    );
    assert!(rank(vec![rec("a", 1)], 20).len() == 1);
}

// --- word pipeline ---

#[test]
fn test_top_words_scenario() {
    let top = top_words(b"aa bb aa cc bb aa".to_vec(), &Opts::default()).unwrap();
    assert_eq!(
        pairs(&top),
        vec![("aa".into(), 3), ("bb".into(), 2), ("cc".into(), 1)]
    );
}

#[test]
fn test_top_words_empty_input_completes() {
    let top = top_words(Vec::new(), &Opts::default()).unwrap();
    assert!(top.is_empty());
}

#[test]
fn test_top_words_default_limit_is_20() {
    let text: String = (0..30)
        .map(|i| format!("w{} ", "x".repeat(i)))
        .collect();
    let top = top_words(text.into_bytes(), &Opts::default()).unwrap();
    assert_eq!(top.len(), 20);
}

#[test]
fn test_pipeline_idempotent() {
    let text = b"It was the best of times, it was the worst of times".to_vec();
    let opts = Opts {
        top_n: 5,
        ..Default::default()
    };
    let first = top_words(text.clone(), &opts).unwrap();
    let second = top_words(text, &opts).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_pipeline_backpressure_counts_every_word() {
    let mut text = String::new();
    for i in 0..2000 {
        text.push_str(["alpha ", "beta ", "gamma ", "delta "][i % 4]);
    }
    for (capacity, counter) in [(0, CounterKind::Linear), (1, CounterKind::Indexed)] {
        let opts = Opts {
            queue_capacity: capacity,
            counter,
            ..Default::default()
        };
        let top = rank_words(Arc::new(text.clone().into_bytes().into()), &opts, None).unwrap();
        assert_eq!(top.len(), 4);
        assert_eq!(top.iter().map(|r| r.count).sum::<usize>(), 2000);
        assert!(top.iter().all(|r| r.count == 500));
    }
}

// --- sink ---

#[test]
fn test_write_record_text_and_json() {
    let mut buf = Vec::new();
    write_record(&mut buf, &rec("whale", 12), OutputFormat::Text).unwrap();
    write_record(&mut buf, &rec("sea", 3), OutputFormat::Json).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "  12 whale\n{\"word\":\"sea\",\"count\":3}\n"
    );
}

#[test]
fn test_print_top_words_text_output() {
    let out = SharedBuf::default();
    print_top_words(
        Arc::new(b"aa bb aa cc bb aa".to_vec().into()),
        &Opts::default(),
        out.clone(),
        None,
        None,
    )
    .unwrap();
    assert_eq!(out.contents(), "  3 aa\n  2 bb\n  1 cc\n");
}

#[test]
fn test_print_top_words_json_and_progress() {
    let out = SharedBuf::default();
    let seen = Arc::new(Mutex::new(0_usize));
    let seen_cb = Arc::clone(&seen);
    let opts = Opts {
        format: OutputFormat::Json,
        top_n: 1,
        ..Default::default()
    };
    print_top_words(
        Arc::new(b"x y x".to_vec().into()),
        &opts,
        out.clone(),
        None,
        Some(Box::new(move |n: usize| *seen_cb.lock().unwrap() += n) as Box<dyn Fn(usize) + Send>),
    )
    .unwrap();
    assert_eq!(out.contents(), "{\"word\":\"x\",\"count\":2}\n");
    assert_eq!(*seen.lock().unwrap(), 3);
}

// --- progress ---

#[test]
fn test_progress_counts_survive_busy_bar() {
    let bar = create_counter("Tallying", "words");
    let report = progress_callback(&Some(Arc::clone(&bar))).unwrap();
    {
        let _held = bar.lock().unwrap();
        report(5);
    }
    report(3);
    assert_eq!(bar.lock().unwrap().counter, 8);
    report(2);
    assert_eq!(bar.lock().unwrap().counter, 10);
}

// --- source ---

#[test]
fn test_load_source_missing_file_is_error() {
    let dir = scratch_dir("missing");
    let err = load_source(&dir.join("nope.txt")).err().unwrap();
    assert!(format!("{err:#}").contains("nope.txt"));
}

#[test]
fn test_load_source_reads_bytes() {
    let dir = scratch_dir("load");
    let path = dir.join("in.txt");
    std::fs::write(&path, b"Call me Ishmael.").unwrap();
    let text = load_source(&path).unwrap();
    assert_eq!(&text[..], b"Call me Ishmael.");
}

// --- config ---

#[test]
fn test_toml_applies_present_fields_only() {
    let file = parse_wordflow_toml(
        "[settings]\ntop_n = 5\ncounter = \"indexed\"\nformat = \"json\"\n",
    )
    .unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.top_n, 5);
    assert_eq!(opts.counter, CounterKind::Indexed);
    assert_eq!(opts.format, OutputFormat::Json);
    assert_eq!(opts.queue_capacity, 100);
    assert_eq!(opts.source, PathBuf::from("mobydick.txt"));
}

#[test]
fn test_toml_rejects_unknown_keys() {
    assert!(parse_wordflow_toml("[settings]\ntopn = 5\n").is_err());
}

#[test]
fn test_env_overrides() {
    let env: HashMap<&str, &str> = [("WORDFLOW_TOP_N", "7"), ("WORDFLOW_QUEUE_CAPACITY", " 3 ")]
        .into_iter()
        .collect();
    let mut opts = Opts::default();
    apply_env_with(|k| env.get(k).map(|v| v.to_string()), &mut opts).unwrap();
    assert_eq!(opts.top_n, 7);
    assert_eq!(opts.queue_capacity, 3);
}

#[test]
fn test_env_invalid_value_is_error() {
    let mut opts = Opts::default();
    let res = apply_env_with(
        |k| (k == "WORDFLOW_TOP_N").then(|| "lots".to_string()),
        &mut opts,
    );
    assert!(res.is_err());
    assert_eq!(opts.top_n, 20);
}

#[test]
fn test_resolve_opts_cli_beats_file() {
    let dir = scratch_dir("resolve");
    std::fs::write(
        dir.join(".wordflow.toml"),
        "[settings]\ntop_n = 5\nqueue_capacity = 8\nsource = \"book.txt\"\n",
    )
    .unwrap();
    let cli = Cli::parse_from(["wordflow", "--top-n", "3", "other.txt"]);
    let opts = resolve_opts(&cli, &dir).unwrap();
    assert_eq!(opts.top_n, 3);
    assert_eq!(opts.queue_capacity, 8);
    assert_eq!(opts.source, PathBuf::from("other.txt"));
    assert!(!opts.verbose);
}

#[test]
fn test_resolve_opts_defaults_without_file() {
    let dir = scratch_dir("defaults");
    let cli = Cli::parse_from(["wordflow", "-v"]);
    let opts = resolve_opts(&cli, &dir).unwrap();
    assert_eq!(opts.source, PathBuf::from("mobydick.txt"));
    assert_eq!(opts.counter, CounterKind::Linear);
    assert!(opts.verbose);
}
