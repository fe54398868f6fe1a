use bourse_core::feed::entity::{ColumnLayout, Delimiter, NumberFormat};
use bourse_core::feed::port::FeedSource;
use bourse_feed::loader::FileFeed;
use std::fs;
use std::io::Write;
use tempfile::tempdir;

fn semicolon_feed(path: &std::path::Path) -> FileFeed {
    FileFeed::new(
        path,
        Delimiter::Semicolon,
        NumberFormat::Continental,
        ColumnLayout::Standard,
    )
}

fn row(ts: &str, price: &str) -> String {
    format!(
        "{};{};+0,10%;7.478,66;7.480,12;+3,2%;12 345;45,6M;7.470 - 7.520;6.760 - 8.259;Achat\n",
        ts, price
    )
}

/// # Summary
/// 文件不存在与文件为空都属于冷启动状态，返回空序列。
#[test]
fn test_absent_and_empty_feed() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("cac40_data.txt");
    let feed = semicolon_feed(&path);

    assert!(feed.load().is_empty());
    assert_eq!(feed.modified_at()?, None);

    fs::write(&path, "")?;
    assert!(feed.load().is_empty());
    assert!(feed.modified_at()?.is_some());
    Ok(())
}

/// # Summary
/// 混杂的合法行与错误行，加载后只保留合法行并按时间升序。
///
/// # Logic
/// 1. 乱序写入 4 条合法行，并在其间插入 4 条错误行（其中一条以未闭合的引号开头）。
/// 2. 断言序列长度为 4 且时间非递减。
/// 3. 断言格式错误的时间戳行被整体丢弃而不是带占位时间保留。
#[test]
fn test_valid_rows_survive_interleaved_garbage() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("cac40_data.txt");
    let mut content = String::new();
    content.push_str(&row("2026-03-02 11:00:00", "7.530,10"));
    content.push_str("not-a-date;100,5;;;;;;;;;\n");
    content.push_str(&row("2026-03-02 09:00:00", "7.500,00"));
    content.push_str("\"garbage row;;;;;;;;;;\n");
    content.push_str("2026-03-02 10:00:00;7.510\n");
    content.push_str(&row("2026-03-01 17:30:00", "7.490,00"));
    content.push_str("2026/03/02 12:00:00;7.540,00;;;;;;;;;\n");
    content.push_str(&row("2026-03-02 10:30:00", "7.520,40"));
    fs::write(&path, content)?;

    let series = semicolon_feed(&path).load();
    assert_eq!(series.len(), 4);
    assert_eq!(series.stats().rejected, 4);
    assert!(
        series
            .as_slice()
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    );
    assert!(series.iter().all(|o| o.price.is_some()));
    assert_eq!(
        series.last().map(|o| o.timestamp.to_string()),
        Some("2026-03-02 11:00:00".to_string())
    );
    Ok(())
}

/// # Summary
/// 相同文件内容的两次加载结果完全一致。
#[test]
fn test_load_is_idempotent() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("cac40_data.txt");
    let mut content = String::new();
    content.push_str(&row("2026-03-02 09:00:00", "7.500,00"));
    content.push_str(&row("2026-03-02 09:00:00", "7.501,00"));
    content.push_str(&row("2026-03-02 08:55:00", "n/d"));
    fs::write(&path, content)?;

    let feed = semicolon_feed(&path);
    let first = feed.load();
    let second = feed.load();
    assert_eq!(first, second);
    // 相同时间戳保持文件中的先后顺序
    let prices: Vec<_> = first.iter().map(|o| o.price).collect();
    assert_eq!(prices, vec![None, Some(7500.0), Some(7501.0)]);
    Ok(())
}

/// # Summary
/// 采集脚本写到一半的最后一行被丢弃，之前的数据不受影响。
#[test]
fn test_partially_written_tail() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("cac40_data.txt");
    fs::write(&path, row("2026-03-02 09:00:00", "7.500,00"))?;

    let mut file = fs::OpenOptions::new().append(true).open(&path)?;
    file.write_all(b"2026-03-02 09:05:00;7.50")?;
    file.flush()?;

    let series = semicolon_feed(&path).load();
    assert_eq!(series.len(), 1);
    assert_eq!(series.stats().rejected, 1);
    Ok(())
}

/// # Summary
/// 点号小数、逗号分隔的数据源按配置解析。
#[test]
fn test_plain_comma_feed() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("quotes.csv");
    fs::write(
        &path,
        "2026-03-02 09:00:00,7512.30,(0.45%),7478.66,7480.12,3.2%,12345,45.6M,7470-7520,6760-8259,Sell\n",
    )?;

    let feed = FileFeed::new(
        &path,
        Delimiter::Comma,
        NumberFormat::Plain,
        ColumnLayout::Standard,
    );
    let series = feed.load();
    assert_eq!(series.len(), 1);
    let obs = &series.as_slice()[0];
    assert_eq!(obs.price, Some(7512.3));
    assert_eq!(obs.variation_value, Some(-0.45));
    assert_eq!(obs.variation.as_deref(), Some("(0.45%)"));
    Ok(())
}
