//! Built-in extraction prompt.
//!
//! Used whenever the caller does not supply a `prompt` form field. The template instructs the
//! model to answer with JSON only, to leave unknown fields empty instead of inventing values,
//! to collect every document found in the upload into one shared `documentos` array, and to
//! answer in Portuguese. It is treated as opaque text: never parsed or validated here.

/// Default instruction template covering the three supported document layouts
/// (carteirinha / CNH / RG).
pub const DEFAULT_PROMPT: &str = r#"
Analise o conteúdo do arquivo fornecido e extraia as informações relevantes.
Responda em formato JSON. Inclua apenas os campos para os quais você pode extrair informações.
Se houver mais de um documento no arquivo, responda utilizando a estrutura de exemplo, incluindo as informações de cada documento no mesmo array.
Para cada campo do exemplo fornecido, caso não encontre informações no arquivo, deixe o campo vazio, não invente informações.
Para o campo data_processamento, coloque as informações de data hora do momento que gerou a resposta.
Utilize os exemplos de estrutura JSON fornecidos. Não altere esse formato:
Para uma carteirinha, use o seguinte formato:
{
    "documentos": [
        {
            "tipo_documento": "Carteirinha",
            "numero_documento": "898001160400174",
            "emissor": "Sulamerica",
            "data_emissao": "2019-02-12",
            "data_validade": "26-01",
            "titular": {
                "nome": "Ana Carolina Souza",
                "data_nascimento": "1988-07-25"
            },
            "dependente": {
                "nome": "Carlos Alberto",
                "data_nascimento": "2000-07-25"
            },
            "dados_extras": {
                "plano_saude": "FUNC SP I",
                "categoria": "APARTAMENTO",
                "produto": 582,
                "abrangencia": "XPTO"
            },
            "metadados": {
                "confianca_extracao": 0.94,
                "data_processamento": "2025-09-09T16:30:00Z"
            }
        }
    ]
}

Para uma carteira de habilitação ou de motorista, use o seguinte formato:
{
    "documentos": [
        {
            "tipo_documento": "CNH",
            "numero_documento": "123456789",
            "emissor": "DETRAN-SP",
            "data_emissao": "2018-05-10", {Para a data_emissao, somente considere o campo data emissão do documento. Senão encontrar, deixe vazio na sua resposta}
            "data_validade": "2028-05-10",
            "titular": {
                "nome": "Ana Carolina Souza",
                "data_nascimento": "1988-07-25"
            }
        }
    ]
}

Para um RG, use o seguinte formato:
{
    "documentos": [
        {
            "tipo_documento": "RG",
            "numero_documento": "123456789",
            "emissor": "SSP-SP", {O emissor deverá ser a informação do campo data emissão. Senão encontrar, procure o campo doc. identidade. Senão encontrar, deixe o campo vazio}
            "data_emissao": "2015-08-22",
            "data_validade": "2025-09-12",
            "titular": {
                "nome": "Ana Carolina Souza",
                "data_nascimento": "1988-07-25"
            }
        }
    ]
}

Responda em português.
"#;
