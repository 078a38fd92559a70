/**
 * Chunked reading of local files.
 *  Streams a file as index-ordered, fixed-size
 *  pieces that line up with the server's chunk table.
 */
pub mod chunk;
/**
 * Cryptographic types and operations.
 *  - Symmetric key used to encrypt file names at rest
 *  - Key derivation from the user's crypto passphrase
 */
pub mod crypto;
