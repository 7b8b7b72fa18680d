//! Multipart upload support
//!
//! Splits a payload into parts and uploads them with a bounded number of
//! part transfers in flight. A failed part or completion aborts the
//! multipart session so no partial object becomes visible.

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use futures::{StreamExt, TryStreamExt, stream};

use bp_core::traits::{MAX_PART_SIZE, MIN_PART_SIZE};
use bp_core::{Error, Result, UploadOptions};

/// Maximum number of parts: 10,000 (S3 limit)
pub const MAX_PARTS: usize = 10_000;

/// Calculate the part size for a payload
///
/// Starts from the preferred size and grows it when the payload would need
/// more than `MAX_PARTS` parts.
pub fn calculate_part_size(total_size: u64, preferred: u64) -> u64 {
    let preferred = preferred.clamp(MIN_PART_SIZE, MAX_PART_SIZE);

    if total_size <= preferred {
        return preferred;
    }

    let parts = total_size.div_ceil(preferred);

    if parts <= MAX_PARTS as u64 {
        preferred
    } else {
        let required_size = total_size.div_ceil(MAX_PARTS as u64);
        required_size.clamp(MIN_PART_SIZE, MAX_PART_SIZE)
    }
}

/// Calculate number of parts for a payload
pub fn calculate_parts(total_size: u64, part_size: u64) -> usize {
    total_size.div_ceil(part_size) as usize
}

/// Get byte range `[start, end)` for a 1-based part number
pub fn part_byte_range(part_number: i32, part_size: u64, total_size: u64) -> (u64, u64) {
    let start = (part_number as u64 - 1) * part_size;
    let end = (start + part_size).min(total_size);
    (start, end)
}

/// Whether a payload of this size needs a multipart session
pub fn needs_multipart(total_size: u64, options: &UploadOptions) -> bool {
    total_size > options.part_size
}

/// Upload a payload as a multipart object
pub(crate) async fn upload_multipart(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    data: &[u8],
    options: &UploadOptions,
) -> Result<()> {
    let total_size = data.len() as u64;
    let part_size = calculate_part_size(total_size, options.part_size);

    let created = client
        .create_multipart_upload()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| Error::Upload(DisplayErrorContext(&e).to_string()))?;

    let upload_id = created
        .upload_id()
        .ok_or_else(|| Error::Upload("Service returned no upload ID".into()))?
        .to_string();

    tracing::debug!(
        bucket,
        key,
        upload_id = %upload_id,
        total_size,
        part_size,
        parts = calculate_parts(total_size, part_size),
        concurrency = options.concurrency,
        "Started multipart upload"
    );

    let result = async {
        let parts = upload_parts(
            client,
            bucket,
            key,
            &upload_id,
            data,
            part_size,
            options.concurrency,
        )
        .await?;
        complete(client, bucket, key, &upload_id, parts).await
    }
    .await;

    if result.is_err() {
        abort(client, bucket, key, &upload_id).await;
    }

    result
}

async fn upload_parts(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    upload_id: &str,
    data: &[u8],
    part_size: u64,
    concurrency: usize,
) -> Result<Vec<CompletedPart>> {
    let total_size = data.len() as u64;
    let count = calculate_parts(total_size, part_size) as i32;

    let mut parts: Vec<CompletedPart> = stream::iter(1..=count)
        .map(|part_number| {
            let (start, end) = part_byte_range(part_number, part_size, total_size);
            let body = ByteStream::from(data[start as usize..end as usize].to_vec());
            async move {
                let response = client
                    .upload_part()
                    .bucket(bucket)
                    .key(key)
                    .upload_id(upload_id)
                    .part_number(part_number)
                    .body(body)
                    .send()
                    .await
                    .map_err(|e| {
                        Error::Upload(format!(
                            "part {part_number}: {}",
                            DisplayErrorContext(&e)
                        ))
                    })?;

                tracing::debug!(part_number, bytes = end - start, "Uploaded part");

                Ok::<_, Error>(
                    CompletedPart::builder()
                        .set_e_tag(response.e_tag().map(str::to_string))
                        .part_number(part_number)
                        .build(),
                )
            }
        })
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await?;

    parts.sort_by_key(|p| p.part_number());
    Ok(parts)
}

async fn complete(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    upload_id: &str,
    parts: Vec<CompletedPart>,
) -> Result<()> {
    let upload = CompletedMultipartUpload::builder()
        .set_parts(Some(parts))
        .build();

    client
        .complete_multipart_upload()
        .bucket(bucket)
        .key(key)
        .upload_id(upload_id)
        .multipart_upload(upload)
        .send()
        .await
        .map_err(|e| Error::Upload(DisplayErrorContext(&e).to_string()))?;

    Ok(())
}

async fn abort(client: &aws_sdk_s3::Client, bucket: &str, key: &str, upload_id: &str) {
    match client
        .abort_multipart_upload()
        .bucket(bucket)
        .key(key)
        .upload_id(upload_id)
        .send()
        .await
    {
        Ok(_) => tracing::debug!(upload_id, "Aborted multipart upload"),
        Err(e) => tracing::warn!(
            upload_id,
            "Failed to abort multipart upload: {}",
            DisplayErrorContext(&e)
        ),
    }
}
