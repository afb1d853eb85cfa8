//! Shared helpers: in-memory xlsx workbooks and job polling

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use session_parser::{
    JobOrchestrator, JobRecord, JobStatus, LocalFileStore, Result, ScheduleStore,
};
use tokio::sync::Semaphore;
use uuid::Uuid;
use zip::write::SimpleFileOptions;

enum CellData {
    Text(String),
    Number(f64),
}

/// One worksheet of a generated workbook
pub struct SheetSpec {
    name: String,
    rows: BTreeMap<u32, Vec<(String, CellData)>>,
}

impl SheetSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: BTreeMap::new(),
        }
    }

    pub fn text(mut self, cell_ref: &str, value: &str) -> Self {
        self.push(cell_ref, CellData::Text(value.to_string()));
        self
    }

    pub fn number(mut self, cell_ref: &str, value: f64) -> Self {
        self.push(cell_ref, CellData::Number(value));
        self
    }

    fn push(&mut self, cell_ref: &str, data: CellData) {
        let row: u32 = cell_ref
            .trim_start_matches(|c: char| c.is_ascii_alphabetic())
            .parse()
            .expect("cell reference like B12");
        self.rows
            .entry(row)
            .or_default()
            .push((cell_ref.to_string(), data));
    }

    fn to_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        for (row, cells) in &self.rows {
            xml.push_str(&format!(r#"<row r="{}">"#, row));
            for (cell_ref, data) in cells {
                match data {
                    CellData::Text(text) => xml.push_str(&format!(
                        r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                        cell_ref,
                        escape(text)
                    )),
                    CellData::Number(n) => {
                        xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, cell_ref, n))
                    }
                }
            }
            xml.push_str("</row>");
        }
        xml.push_str("</sheetData></worksheet>");
        xml
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Build a minimal xlsx workbook holding the given sheets in order
pub fn build_xlsx(sheets: &[SheetSpec]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    );
    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut workbook_rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );

    for (i, sheet) in sheets.iter().enumerate() {
        let n = i + 1;
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            n
        ));
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(&sheet.name),
            n,
            n
        ));
        workbook_rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            n, n
        ));
    }
    content_types.push_str("</Types>");
    workbook.push_str("</sheets></workbook>");
    workbook_rels.push_str("</Relationships>");

    let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

    let mut files = vec![
        ("[Content_Types].xml".to_string(), content_types),
        ("_rels/.rels".to_string(), root_rels.to_string()),
        ("xl/workbook.xml".to_string(), workbook),
        ("xl/_rels/workbook.xml.rels".to_string(), workbook_rels),
    ];
    for (i, sheet) in sheets.iter().enumerate() {
        files.push((format!("xl/worksheets/sheet{}.xml", i + 1), sheet.to_xml()));
    }

    for (name, content) in files {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// Grid sheet: title in A1, groups on row 10, entries from row 12
pub fn matrix_sheet() -> SheetSpec {
    SheetSpec::new("Сессия")
        .text("A1", "Расписание экзаменов зимней сессии")
        .text("C10", "ИВТ-21")
        .text("D10", "ПИ-22")
        .number("A12", 45306.0)
        .text("C12", "305 Физика Иванов И.И.")
        .text("D12", "занятия")
        .number("A13", 45307.0)
        .text("C13", "Консультация по химии")
        .text("D13", "Право (консультация) дист.")
        .text("C14", "Биология")
        .number("A15", 45308.0)
        .text("C15", "412а Химия диф. зачет Петрова А.Б.")
        .text("D15", "Практика учебная")
}

/// One-entry-per-row sheet with a carried-forward teacher
pub fn flat_sheet() -> SheetSpec {
    SheetSpec::new("Лист2")
        .text("A1", "ФИО")
        .text("B1", "Дата")
        .text("C1", "Группа")
        .text("D1", "Предмет")
        .text("E1", "Контроль")
        .text("A2", "Сидоров С.С.")
        .text("B2", "1/20/24")
        .text("C2", "ИВТ-21")
        .text("D2", "История")
        .text("E2", "Экзамен")
        .text("B3", "1/22/24")
        .text("C3", "ПИ-22")
        .text("D3", "Философия")
        .text("E3", "зачет")
}

/// Workbook with both layouts
pub fn schedule_workbook() -> Vec<u8> {
    build_xlsx(&[matrix_sheet(), flat_sheet()])
}

/// Poll until the job reaches a terminal state
pub async fn wait_for_terminal(orchestrator: &JobOrchestrator, id: Uuid) -> JobRecord {
    for _ in 0..500 {
        let job = orchestrator.status(id).unwrap();
        if job.status.is_terminal() {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("job {} did not finish", id);
}

/// Poll until a condition on the orchestrator holds
pub async fn wait_until(orchestrator: &JobOrchestrator, cond: impl Fn(&JobOrchestrator) -> bool) {
    for _ in 0..500 {
        if cond(orchestrator) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached");
}

/// Local store whose upload reads wait for a gate to open
pub struct GatedStore {
    inner: LocalFileStore,
    gate: Semaphore,
    reading: AtomicUsize,
    max_reading: AtomicUsize,
}

impl GatedStore {
    pub fn new(root: &Path) -> Arc<Self> {
        Arc::new(Self {
            inner: LocalFileStore::under(root),
            gate: Semaphore::new(0),
            reading: AtomicUsize::new(0),
            max_reading: AtomicUsize::new(0),
        })
    }

    /// Let every pending and future read through
    pub fn open(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }

    /// Most reads ever in flight at once
    pub fn max_reading(&self) -> usize {
        self.max_reading.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScheduleStore for GatedStore {
    async fn ensure_layout(&self) -> Result<()> {
        self.inner.ensure_layout().await
    }

    async fn store_upload(&self, job_id: Uuid, extension: &str, data: &[u8]) -> Result<PathBuf> {
        self.inner.store_upload(job_id, extension, data).await
    }

    async fn read_upload(&self, path: &Path) -> Result<Vec<u8>> {
        let now = self.reading.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_reading.fetch_max(now, Ordering::SeqCst);

        let permit = self.gate.acquire().await.expect("gate never closes");
        permit.forget();

        self.reading.fetch_sub(1, Ordering::SeqCst);
        self.inner.read_upload(path).await
    }

    async fn discard_upload(&self, path: &Path) -> Result<()> {
        self.inner.discard_upload(path).await
    }

    fn result_path(&self, job_id: Uuid) -> PathBuf {
        self.inner.result_path(job_id)
    }

    async fn store_result(&self, job_id: Uuid, data: &[u8]) -> Result<PathBuf> {
        self.inner.store_result(job_id, data).await
    }

    async fn read_result(&self, path: &Path) -> Result<Vec<u8>> {
        self.inner.read_result(path).await
    }

    fn name(&self) -> &str {
        "gated-local"
    }
}

/// Statuses of all jobs, in submission order
pub fn statuses(orchestrator: &JobOrchestrator) -> Vec<JobStatus> {
    orchestrator.list().into_iter().map(|j| j.status).collect()
}

/// Local store whose upload reads panic
pub struct PanickingStore {
    inner: LocalFileStore,
}

impl PanickingStore {
    pub fn new(root: &Path) -> Arc<Self> {
        Arc::new(Self {
            inner: LocalFileStore::under(root),
        })
    }
}

#[async_trait]
impl ScheduleStore for PanickingStore {
    async fn ensure_layout(&self) -> Result<()> {
        self.inner.ensure_layout().await
    }

    async fn store_upload(&self, job_id: Uuid, extension: &str, data: &[u8]) -> Result<PathBuf> {
        self.inner.store_upload(job_id, extension, data).await
    }

    async fn read_upload(&self, path: &Path) -> Result<Vec<u8>> {
        panic!("upload store went away: {}", path.display());
    }

    async fn discard_upload(&self, path: &Path) -> Result<()> {
        self.inner.discard_upload(path).await
    }

    fn result_path(&self, job_id: Uuid) -> PathBuf {
        self.inner.result_path(job_id)
    }

    async fn store_result(&self, job_id: Uuid, data: &[u8]) -> Result<PathBuf> {
        self.inner.store_result(job_id, data).await
    }

    async fn read_result(&self, path: &Path) -> Result<Vec<u8>> {
        self.inner.read_result(path).await
    }

    fn name(&self) -> &str {
        "panicking-local"
    }
}
