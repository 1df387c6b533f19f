//! Error reporting for the trackbin CLI

use trackbin_core::TrackError;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &anyhow::Error) -> String {
    let mut message = format!("{:#}", error);

    let Some(track_error) = error.chain().find_map(|e| e.downcast_ref::<TrackError>()) else {
        return message;
    };

    // Add helpful suggestions based on error type
    match track_error {
        TrackError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the track directory is correct: {}\n\
                 • Track files are named <chr>_bw<bin width>_c<mode>_<genome>.trackbin\n\
                 • Check --bin-width, --mode and --genome against the files on disk",
                path.parent().map(|p| p.display().to_string()).unwrap_or_default()
            ));
        }

        TrackError::ReadsFile { .. } | TrackError::ReadsParse { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Each genome needs a reads_<genome>.txt file next to its tracks\n\
                 • The first line must hold the total read count as a plain integer"
            );
        }

        TrackError::RangeOutOfBounds { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check that the location lies within the chromosome\n\
                 • Use 'trackbin header <chr>' to see how many bins the track holds"
            );
        }

        TrackError::FormatMismatch(_) => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Ensure the file is a .trackbin file and is not truncated\n\
                 • Review the [validation] section of your trackbin.toml"
            );
        }

        TrackError::InvalidLocation(_) => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Locations are written chr:start-end, 1-based and inclusive\n\
                 • Example: chr1:1000000-1010000"
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &anyhow::Error) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
