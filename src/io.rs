use anyhow::{bail, Context, Result};
use std::path::Path;

/// A sequence together with the name it is reported under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedSequence {
    pub name: String,
    pub sequence: String,
}

/// Utility function to extract the error from an iterator and stop iteration immediately. Useful
/// for iterators which yield a Result<T>.
///
/// # Returns
///
/// This function returns an `Option<T>`. If the item is `Ok`, it returns `Some(T)`.
/// If the item is `Err`, it updates `err` with the error and returns `None`.
///
/// # Example
/// ```
/// use hexcodon::io::until_err;
///
/// let mut err = Ok(());
/// let items = vec![Ok(1), Ok(2), Err(anyhow::anyhow!("error")), Ok(3)];
/// let results: Vec<_> = items
///   .into_iter()
///   .scan(&mut err, until_err)
///   .collect();
/// assert_eq!(results, vec![1, 2]);
/// assert!(err.is_err());
/// ```
pub fn until_err<T>(err: &mut &mut Result<()>, item: Result<T>) -> Option<T> {
    match item {
        Ok(item) => Some(item),
        Err(e) => {
            **err = Err(e);
            None
        }
    }
}

fn check_length(name: &str, sequence: &str, max_length: usize) -> Result<()> {
    if sequence.len() > max_length {
        bail!(
            "Sequence {name} has {} nucleotides, above the limit of {max_length}",
            sequence.len()
        );
    }
    Ok(())
}

/// Reads every record of a FASTA or FASTQ file (optionally compressed).
///
/// Records are named by the first word of their header.
///
/// # Errors
///
/// This function will return an error if:
/// * The file cannot be opened or is not FASTA/FASTQ.
/// * A record cannot be parsed.
/// * A record is longer than `max_length`.
pub fn read_sequences<P: AsRef<Path>>(path: P, max_length: usize) -> Result<Vec<NamedSequence>> {
    let path = path.as_ref();
    let mut reader = needletail::parse_fastx_file(path)
        .with_context(|| format!("Unable to open file {}", path.display()))?;

    let mut err = Ok(());
    // records borrow the reader's buffer, so copy each one out before the next read
    let records: Vec<NamedSequence> = std::iter::from_fn(|| {
        reader.next().map(|record| -> Result<NamedSequence> {
            let record = record.context("Unable to parse record")?;

            let id = String::from_utf8_lossy(record.id());
            let name = id.split_whitespace().next().unwrap_or_default().to_string();
            let sequence = String::from_utf8_lossy(&record.seq()).into_owned();

            check_length(&name, &sequence, max_length)?;
            Ok(NamedSequence { name, sequence })
        })
    })
    .scan(&mut err, until_err)
    .collect();
    err.with_context(|| format!("Failed while reading {}", path.display()))?;

    info!("Read {} sequences from {}", records.len(), path.display());
    Ok(records)
}

/// Gathers the sequences passed on the command line, followed by those in
/// `input` if one is given.
///
/// Command-line sequences are named `Sequence_1`, `Sequence_2` and so on.
pub fn collect_sequences(
    args: &[String],
    input: Option<&str>,
    max_length: usize,
) -> Result<Vec<NamedSequence>> {
    let mut sequences = Vec::with_capacity(args.len());
    for (i, sequence) in args.iter().enumerate() {
        let name = format!("Sequence_{}", i + 1);
        check_length(&name, sequence, max_length)?;
        sequences.push(NamedSequence {
            name,
            sequence: sequence.clone(),
        });
    }

    if let Some(path) = input {
        sequences.extend(read_sequences(path, max_length)?);
    }

    if sequences.is_empty() {
        bail!(indoc::formatdoc! {"
            No sequences given.
            Pass them as arguments, or read a FASTA/FASTQ file with --input."
        });
    }
    Ok(sequences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fasta(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".fasta").tempfile().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_fasta_records() {
        let file = fasta(">first some description\nATGAAA\nCCC\n>second\nGGG\n");
        let records = read_sequences(file.path(), 100).unwrap();
        assert_eq!(
            records,
            vec![
                NamedSequence {
                    name: "first".to_string(),
                    sequence: "ATGAAACCC".to_string()
                },
                NamedSequence {
                    name: "second".to_string(),
                    sequence: "GGG".to_string()
                },
            ]
        );
    }

    #[test]
    fn length_limit() {
        let file = fasta(">long\nATGATGATG\n");
        let err = read_sequences(file.path(), 5).unwrap_err();
        assert!(format!("{err:#}").contains("above the limit of 5"));

        assert!(collect_sequences(&["ATGATG".to_string()], None, 3).is_err());
    }

    #[test]
    fn arguments_then_file() {
        let file = fasta(">from_file\nTTT\n");
        let path = file.path().to_str().unwrap();
        let all = collect_sequences(&["AAA".to_string()], Some(path), 100).unwrap();
        assert_eq!(all[0].name, "Sequence_1");
        assert_eq!(all[1].name, "from_file");

        assert!(collect_sequences(&[], None, 100).is_err());
    }

    #[test]
    fn missing_file() {
        assert!(read_sequences("does/not/exist.fasta", 100).is_err());
    }
}
