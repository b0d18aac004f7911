mod helpers;
mod test_export;
mod test_gallery;
