use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_cybuf::{cybuf, from_str, parse, to_string, to_string_indented, Value};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Clone, Default)]
#[allow(non_snake_case)]
#[serde(default)]
struct People {
    Name: String,
    Age: i32,
    Weight: f64,
    Live: bool,
    Friends: Vec<People>,
    School: School,
}

#[derive(Serialize, Deserialize, Clone, Default)]
#[allow(non_snake_case)]
#[serde(default)]
struct School {
    Name: String,
    Age: i32,
}

const CYBUF_DOC: &str = r#"
{
	Name: "cybuf"
	Age: 1
	Weight: 100.2
	School: {
		Name: "Wuhan University"
		Age: 120
	}
	Friends: [
		{
			Name: "Zerone"
			Phone: 1010101
		}
		{
			Name: "Acm"
			Phone: 2333
		}
	]
}
"#;

const JSON_DOC: &str = r#"
{
	"Name": "cybuf",
	"Age": 1,
	"Weight": 100.2,
	"School": {
		"Name": "Wuhan University",
		"Age": 120
	},
	"Friends": [
		{
			"Name": "Zerone",
			"Phone": 1010101
		},
		{
			"Name": "Acm",
			"Phone": 2333
		}
	]
}
"#;

fn marshal_map() -> Value {
    cybuf!({
        Name: "yah01",
        Age: 21,
        Live: true,
        School: { Name: "Wuhan University", Age: 120 },
        Wallet: [1.0, 10.0, 100.0]
    })
}

fn json_map() -> HashMap<String, serde_json::Value> {
    serde_json::from_str(
        r#"{"Name":"yah01","Age":21,"Live":true,
            "School":{"Name":"Wuhan University","Age":120},
            "Wallet":[1.0,10.0,100.0]}"#,
    )
    .unwrap()
}

fn benchmark_marshal(c: &mut Criterion) {
    let mut group = c.benchmark_group("marshal_map");
    let value = marshal_map();
    let json = json_map();

    group.bench_function("cybuf", |b| b.iter(|| to_string(black_box(&value))));
    group.bench_function("cybuf_indented", |b| {
        b.iter(|| to_string_indented(black_box(&value)))
    });
    group.bench_function("json", |b| b.iter(|| serde_json::to_string(black_box(&json))));
    group.bench_function("json_pretty", |b| {
        b.iter(|| serde_json::to_string_pretty(black_box(&json)))
    });
    group.finish();
}

fn benchmark_unmarshal(c: &mut Criterion) {
    let mut group = c.benchmark_group("unmarshal_document");

    group.bench_function("cybuf_value", |b| {
        b.iter(|| from_str::<Value>(black_box(CYBUF_DOC)))
    });
    group.bench_function("cybuf_struct", |b| {
        b.iter(|| from_str::<People>(black_box(CYBUF_DOC)))
    });
    group.bench_function("cybuf_parse_only", |b| b.iter(|| parse(black_box(CYBUF_DOC))));
    group.bench_function("json_value", |b| {
        b.iter(|| serde_json::from_str::<serde_json::Value>(black_box(JSON_DOC)))
    });
    group.finish();
}

fn benchmark_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("people_array");

    for size in [10, 50, 100, 500].iter() {
        let people: Vec<People> = (0..*size)
            .map(|i| People {
                Name: format!("person{}", i),
                Age: i,
                Weight: 50.5 + f64::from(i),
                Live: i % 2 == 0,
                Friends: vec![],
                School: School {
                    Name: "Wuhan University".to_string(),
                    Age: 120,
                },
            })
            .collect();
        let text = to_string(&people).unwrap();

        group.bench_with_input(BenchmarkId::new("serialize", size), &people, |b, people| {
            b.iter(|| to_string(black_box(people)))
        });
        group.bench_with_input(BenchmarkId::new("deserialize", size), &text, |b, text| {
            b.iter(|| from_str::<Vec<People>>(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("strings");

    let plain = "This is a medium length string with some content".repeat(4);
    let escaped = "line\n\"quoted\"\ttab\\".repeat(16);

    group.bench_function("serialize_plain", |b| b.iter(|| to_string(black_box(&plain))));
    group.bench_function("serialize_escaped", |b| {
        b.iter(|| to_string(black_box(&escaped)))
    });

    let escaped_text = to_string(&escaped).unwrap();
    group.bench_function("deserialize_escaped", |b| {
        b.iter(|| from_str::<String>(black_box(&escaped_text)))
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_marshal,
    benchmark_unmarshal,
    benchmark_arrays,
    benchmark_strings
);
criterion_main!(benches);
