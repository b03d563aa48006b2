use crate::pipeline::Progress;
use crate::record::{FileRecord, PlanDelta};
use std::collections::{HashMap, HashSet};

/// Makes every effective name in a batch unique.
///
/// Records sharing an effective name form a group. Within a group of two or
/// more, each renamed member gets the lowest free ` (n)` suffix, padded to
/// the digit count of the group size. Records that keep their original name
/// are never touched; their names still count as taken. Blank planned names
/// stay blank so the executor rejects them.
///
/// Progress covers two passes over the batch: `(0, 2n)` first, then one step
/// per record per pass, then `(0, 2n)` again.
pub fn resolve_collisions(
    records: Vec<FileRecord>,
    progress: &mut Progress<'_>,
) -> Vec<FileRecord> {
    let total = records.len() * 2;
    let mut step = 0usize;
    progress.report(0, total);

    let mut taken = HashSet::with_capacity(records.len());
    let mut group_of = HashMap::<String, usize>::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let name = record.effective_name();
        let group = *group_of.entry(name.clone()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[group].push(index);
        taken.insert(name);

        step += 1;
        progress.report(step, total);
    }

    let mut deltas: Vec<PlanDelta> = vec![PlanDelta::keep(); records.len()];
    for members in &groups {
        let digits = members.len().to_string().len();
        for &index in members {
            let record = &records[index];
            if members.len() > 1 && record.is_name_changed() && record.is_valid() {
                let name = next_free_name(record, digits, &mut taken);
                deltas[index] = PlanDelta::name(name);
            }

            step += 1;
            progress.report(step, total);
        }
    }

    progress.report(0, total);

    let renamed = deltas.iter().filter(|d| !d.is_keep()).count();
    if renamed > 0 {
        log::debug!("suffixed {renamed} colliding names");
    }

    records
        .into_iter()
        .zip(deltas)
        .map(|(record, delta)| record.with_plan(delta))
        .collect()
}

/// Finds the lowest ` (n)` suffix not yet taken and reserves it.
fn next_free_name(record: &FileRecord, digits: usize, taken: &mut HashSet<String>) -> String {
    let extension = if record.is_folder {
        ""
    } else {
        record.planned_extension()
    };

    let mut counter = 1usize;
    loop {
        let name = format!("{} ({counter:0digits$})", record.planned_name());
        let full = format!("{name}{extension}");
        if taken.insert(full) {
            return name;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_collisions;
    use crate::pipeline::Progress;
    use crate::record::{FileRecord, PlanDelta};
    use std::collections::HashSet;

    fn planned(path: &str, name: &str, ext: &str, planned: &str) -> FileRecord {
        FileRecord::new(path, name, ext).with_plan(PlanDelta::name(planned))
    }

    fn resolve(records: Vec<FileRecord>) -> Vec<FileRecord> {
        resolve_collisions(records, &mut Progress::none())
    }

    fn effective(records: &[FileRecord]) -> Vec<String> {
        records.iter().map(FileRecord::effective_name).collect()
    }

    #[test]
    fn suffixes_in_input_order_starting_at_one() {
        let out = resolve(vec![
            planned("/a/a.jpg", "a", ".jpg", "Xa"),
            planned("/b/a.jpg", "a", ".jpg", "Xa"),
        ]);
        assert_eq!(effective(&out), vec!["Xa (1).jpg", "Xa (2).jpg"]);
    }

    #[test]
    fn blank_names_are_not_suffixed_into_valid_ones() {
        let out = resolve(vec![
            planned("/a/a.jpg", "a", ".jpg", ""),
            planned("/b/b.jpg", "b", ".jpg", ""),
        ]);
        assert_eq!(effective(&out), vec![".jpg", ".jpg"]);
        assert!(out.iter().all(|record| !record.is_valid()));
    }

    #[test]
    fn group_of_eleven_uses_two_digit_suffixes() {
        let records = (0..11)
            .map(|i| planned(&format!("/d{i}/p.jpg"), "p", ".jpg", "same"))
            .collect();
        let out = resolve(records);
        let names = effective(&out);
        assert_eq!(names[0], "same (01).jpg");
        assert_eq!(names[9], "same (10).jpg");
        assert_eq!(names[10], "same (11).jpg");
    }

    #[test]
    fn unchanged_record_keeps_its_name_and_blocks_changed_one() {
        let out = resolve(vec![
            FileRecord::new("/p/b.jpg", "b", ".jpg"),
            planned("/p/a.jpg", "a", ".jpg", "b"),
        ]);
        assert!(!out[0].is_name_changed());
        assert_eq!(effective(&out), vec!["b.jpg", "b (1).jpg"]);
    }

    #[test]
    fn skips_suffixes_that_already_exist_in_batch() {
        let out = resolve(vec![
            FileRecord::new("/p/x (1).jpg", "x (1)", ".jpg"),
            planned("/p/a.jpg", "a", ".jpg", "x"),
            planned("/p/b.jpg", "b", ".jpg", "x"),
        ]);
        assert_eq!(effective(&out), vec!["x (1).jpg", "x (2).jpg", "x (3).jpg"]);
    }

    #[test]
    fn distinct_extensions_do_not_collide() {
        let out = resolve(vec![
            planned("/p/a.jpg", "a", ".jpg", "x"),
            planned("/p/a.png", "a", ".png", "x"),
        ]);
        assert_eq!(effective(&out), vec!["x.jpg", "x.png"]);
    }

    #[test]
    fn result_is_unique_for_heavy_collisions() {
        let mut records = Vec::new();
        for i in 0..40 {
            records.push(planned(&format!("/p/f{i}.txt"), &format!("f{i}"), ".txt", "n"));
        }
        for i in 1..=5 {
            let name = format!("n ({i:02})");
            records.push(FileRecord::new(format!("/p/{name}.txt"), name, ".txt"));
        }

        let out = resolve(records);
        let names = effective(&out);
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert_eq!(names[0], "n (06).txt");
    }

    #[test]
    fn reports_two_passes_of_progress() {
        let mut calls = Vec::new();
        let mut callback = |current: usize, total: usize| calls.push((current, total));
        let mut progress = Progress::new(&mut callback);

        resolve_collisions(
            vec![
                planned("/p/a.jpg", "a", ".jpg", "x"),
                planned("/p/b.jpg", "b", ".jpg", "x"),
            ],
            &mut progress,
        );
        assert_eq!(calls.first(), Some(&(0, 4)));
        assert_eq!(calls.last(), Some(&(0, 4)));
        assert!(calls.contains(&(4, 4)));
    }
}
